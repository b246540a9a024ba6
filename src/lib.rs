//! `argmill` is a POSIX-flavoured command line argument parser for Rust.
//!
//! Declare the interface of your program once (flags, single & multi-valued options, positional arguments), then parse the process arguments before your main logic runs.
//! `argmill` attempts to prioritize the following design concerns:
//! * *Type safe values*:
//! Every option is declared with a type `T`, and its raw tokens are cast into `T` by the parser.
//! The user should not call any `&str -> T` conversion functions directly.
//! * *Whole-configuration validation*:
//! Option modifiers (required, default, allowed values) are validated as a whole.
//! Incompatible modifiers are reported the same way, regardless of the order they are applied in.
//! * *Shared options*:
//! Options that every program of a suite recognizes (ex: `--verbose`) may be registered once on a [`GlobalRegistry`].
//! * *Familiar syntax*:
//! The grammar follows the usual POSIX/GNU conventions, including grouped short options and an optional tail marker.
//!
//! # Usage
//! This page includes a few demos on using `argmill`.
//! More demos are outlined in [the source](https://github.com/argmill/argmill/tree/main/demos).
//!
//! ```no_run
#![doc = include_str!("../demos/demo_make.rs")]
//! ```
//!
//! ```console
//! $ make --help
//! usage: make [--help] [-D DEFINE ...] [-C DIRECTORY] [-j JOBS] [-k] [--mode MODE] [ARG0]
//!
//! positional arguments:
//!  ARG0                                  The target to build.
//!
//! options:
//!  --help                                Show this help message and exit.
//!  -D DEFINE, --define DEFINE            Define a variable (NAME=VALUE).
//!  -C DIRECTORY, --directory DIRECTORY   Change to this directory first.
//!  -j JOBS, --jobs JOBS                  The number of jobs to run at once.
//!  -k, --keep-going                      Keep going when some targets fail.
//!  --mode MODE                           The build mode.
//!
//! $ make -k -j4 --mode=release install -DPREFIX=/usr
//! Building install in release mode with 4 job(s), keeping going.
//!   define PREFIX=/usr
//!
//! $ make -j four
//! Parse error: Option 'jobs' cannot convert 'four' to usize.
//! -j four
//! ^
//!
//! $ make --mode fast
//! Parse error: Option 'mode' does not allow the value 'fast'.
//! --mode fast
//! ^
//! ```
//!
//! # Declaring options
//! Start with a [`Parser`] and declare the options on it.
//! Each declaration returns a *handle*, through which the parsed value is read back after parsing.
//!
//! * [`Parser::add_flag`] declares a flag, taking no values (ex: `--verbose`).
//! Its [`FlagHandle`] counts the occurrences, so `-vvv` counts 3.
//! * [`Parser::add_arg`] declares a single-valued option (ex: `--jobs 4`).
//! Its [`ArgHandle`] holds at most one value; specifying the option twice is an error.
//! * [`Parser::add_multi_arg`] declares a multi-valued option (ex: `-I src -I lib`).
//! Its [`MultiArgHandle`] collects one value per occurrence, in order.
//! * [`Parser::add_positional_arg`] declares the next positional argument.
//! Positional arguments are filled in declaration order.
//!
//! Every option has a unique fullname (`--fullname`) and, optionally, a unique single character shortname (`-s`).
//! The fullname `help` is reserved.
//!
//! ### Modifiers
//! The value-taking handles may be configured further:
//! * `required()`: the option must be given a value, checked after all the tokens are parsed.
//! * `default(..)`: the value(s) held when the option isn't specified.
//! For a single-valued option, the first explicit value replaces the default.
//! For a multi-valued option, the defaults are discarded entirely on the first explicit value.
//! * `options(..)`: a non-empty list of allowed values.
//! * `cast_using(..)`: a custom caster, used instead of [`ArgValue::cast`].
//!
//! `required` and `default` are mutually exclusive.
//! A default must be among the allowed values.
//!
//! ### Values
//! The type `T` of an option must implement [`ArgValue`].
//! `argmill` provides implementations for `bool` (only `true` or `false`), `char`, `String`, and the integer & floating point primitives.
//! Numbers are parsed strictly: the whole token must be a valid number within the range of `T`.
//!
//! Allowed values require *equality* on `T`.
//! Equality is an opt-in capability of [`ArgValue`] (see [`equatable`]); declaring allowed values for a type without it is a configuration error.
//!
//! ```
#![doc = include_str!("../demos/demo_custom_value.rs")]
//! ```
//!
//! ### Global options
//! Options registered via [`add_global_flag`], [`add_global_arg`] or [`add_global_multi_arg`] are recognized by every [`Parser::new`] parser of the process.
//! Such a parser refuses local options whose fullname or shortname collide with a global one.
//! To opt out, call [`Parser::ignore_global_registry`] (before declaring local options), or start from [`Parser::isolated`].
//!
//! ```no_run
#![doc = include_str!("../demos/demo_global.rs")]
//! ```
//!
//! # Cli Semantics
//! `argmill` walks the tokens left to right, skipping the program name, according to the following rules.
//!
//! * If a tail marker is configured (ex: `parser.parse(Some("--"))`), all the tokens after it are collected verbatim into [`Parser::tail_args`].
//! This check comes before any other.
//! * A token starting with `--` (and longer than 2 characters) is a long option.
//! The key-value pair may be separated with the first `=` character, so `--key=123` is equivalent to `--key 123`.
//! A flag may not be given a value this way.
//! * Any other token starting with `-` (and longer than 1 character) is a group of short options.
//! For example, `-abc` is equivalent to `-a -b -c`.
//! A value-taking short option may only appear last in the group, where it takes the next token (`-abc VALUE`),
//! or first in the group, where it takes the rest of the token (`-c5` is equivalent to `-c 5`).
//! * The value following an option is taken verbatim, even if it starts with `-`.
//! * Any other token (including `-` and the empty token) fills the next positional argument.
//! Once all the positional arguments are filled, such tokens are free arguments, collected into [`Parser::free_args`] when enabled via [`Parser::enable_free_args`], and an error otherwise.
//! * Any value starting with `\` has that one character removed.
//! This allows values which would otherwise be read as an option, for example `\--literal`.
//! * The token `--help` stops parsing; [`Parser::parse`] then prints the help message and exits.
//!
//! # Errors
//! All fallible operations return an [`ArgError`]:
//! * `ArgError::Config`: the options were declared incorrectly (duplicate or reserved names, incompatible modifiers).
//! * `ArgError::Parse`: the tokens do not match the declared options (unknown options, missing or invalid values, missing required options).
//!
//! # Features
//! * `tracing_debug`: Emit `tracing` debug events for the declarations and each token classification.
pub use argmill_builder::*;
