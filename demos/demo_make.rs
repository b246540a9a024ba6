use argmill::{ArgError, Parser};

fn main() -> Result<(), ArgError> {
    let mut parser = Parser::new();
    let jobs = parser
        .add_arg::<usize>("jobs", Some('j'), "The number of jobs to run at once.")?
        .default(1)?;
    let directory = parser.add_arg::<String>("directory", Some('C'), "Change to this directory first.")?;
    let keep_going = parser.add_flag("keep-going", Some('k'), "Keep going when some targets fail.")?;
    let mode = parser
        .add_arg::<String>("mode", None, "The build mode.")?
        .options(vec!["debug".to_string(), "release".to_string()])?
        .default("debug".to_string())?;
    let defines = parser.add_multi_arg::<String>("define", Some('D'), "Define a variable (NAME=VALUE).")?;
    let target = parser.add_positional_arg::<String>("The target to build.")?;
    parser.enable_free_args();
    parser.parse(Some("--"));

    if let Some(directory) = directory.get() {
        println!("Entering directory '{directory}'.");
    }

    println!(
        "Building {t} in {m} mode with {j} job(s){k}.",
        t = target.get().unwrap_or_else(|| "all".to_string()),
        m = mode.get().unwrap_or_default(),
        j = jobs.get().unwrap_or(1),
        k = if keep_going.is_set() { ", keeping going" } else { "" },
    );

    for define in defines.values() {
        println!("  define {define}");
    }

    for extra in parser.free_args() {
        println!("  extra target {extra}");
    }

    if !parser.tail_args().is_empty() {
        println!("  passing through: {}", parser.tail_args().join(" "));
    }

    Ok(())
}
