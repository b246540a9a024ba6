use argmill::{add_global_flag, add_global_multi_arg, ArgError, FlagHandle, MultiArgHandle, Parser};

struct Logging {
    verbose: FlagHandle,
    modules: MultiArgHandle<String>,
}

// Registered once during setup; every parser created afterwards recognizes these options.
fn register_logging() -> Result<Logging, ArgError> {
    Ok(Logging {
        verbose: add_global_flag("verbose", Some('v'), "Increase the log verbosity.")?,
        modules: add_global_multi_arg::<String>("log-module", None, "Only log this module.")?,
    })
}

fn main() -> Result<(), ArgError> {
    let logging = register_logging()?;

    let mut parser = Parser::new();
    let count = parser
        .add_arg::<u64>("count", Some('n'), "How many times to greet.")?
        .default(1)?;
    let name = parser
        .add_positional_arg::<String>("Who to greet.")?
        .required()?;
    parser.parse(None);

    if logging.verbose.is_set() {
        eprintln!(
            "verbosity={v} modules={m:?}",
            v = logging.verbose.count(),
            m = logging.modules.values(),
        );
    }

    for _ in 0..count.get().unwrap_or(1) {
        println!("Hello, {}!", name.get().unwrap_or_default());
    }

    Ok(())
}
