use argmill::prelude::*;
use argmill::Parser;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Low,
    High,
}

impl ArgValue for Level {
    fn cast(token: &str) -> Result<Self, CastError> {
        match token {
            "low" => Ok(Level::Low),
            "high" => Ok(Level::High),
            _ => Err(CastError::Rejected {
                token: token.to_string(),
                message: "expected 'low' or 'high'".to_string(),
            }),
        }
    }

    fn equality() -> Option<fn(&Self, &Self) -> bool> {
        equatable()
    }
}

fn main() {
    let mut parser = Parser::isolated();
    let level = parser
        .add_arg::<Level>("level", Some('l'), "The level.")
        .unwrap()
        .options(vec![Level::High])
        .unwrap();

    parser.parse_args(&["program", "-lhigh"], None).unwrap();
    assert_eq!(level.get(), Some(Level::High));

    let mut parser = Parser::isolated();
    parser
        .add_arg::<Level>("level", Some('l'), "The level.")
        .unwrap()
        .options(vec![Level::High])
        .unwrap();
    assert!(parser.parse_args(&["program", "-l", "low"], None).is_err());
    assert!(parser.parse_args(&["program", "-l", "medium"], None).is_err());
}
