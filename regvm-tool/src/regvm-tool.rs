#![allow(clippy::uninlined_format_args)]

use regvm::{backends, Error, Flags, Regex};

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "regvm-tool")]
struct Opt {
    /// The regular expression.
    pattern: String,

    /// The flags of the regular expression. 'd' logs every compilation phase
    /// at debug level, unless a --dump option prints them instead.
    #[structopt(long, short, parse(from_str = Flags::from))]
    flags: Option<Flags>,

    /// Dump the tokens to stdout.
    #[structopt(long)]
    dump_tokens: bool,

    /// Dump the postfix tokens to stdout.
    #[structopt(long)]
    dump_postfix: bool,

    /// Dump the bytecode to stdout.
    #[structopt(long)]
    dump_bytecode: bool,

    /// Dump all regular expression compilation phases to stdout.
    #[structopt(long)]
    dump_phases: bool,

    /// The input values to match against.
    #[structopt(conflicts_with_all = &["bench", "file"])]
    inputs: Vec<String>,

    /// Match each line of a specified file.
    #[structopt(long, conflicts_with_all = &["bench", "inputs"])]
    file: Option<PathBuf>,

    /// Benchmark the matches of each line of the specified file.
    #[structopt(long, conflicts_with_all = &["file", "inputs"])]
    bench: Option<PathBuf>,
}

fn exec_re_on_string(re: &Regex, input: &str) {
    if re.is_match(input) {
        println!("Match: {:?}", input);
    } else {
        println!("No match: {:?}", input);
    }
}

fn exec_re_on_path(re: &Regex, path: &Path) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            println!("{}: {}", err, path.display());
            return;
        }
    };
    let mut total = 0;
    let mut matched = 0;
    for line in contents.lines() {
        total += 1;
        if re.is_match(line) {
            matched += 1;
        }
        exec_re_on_string(re, line);
    }
    println!("{} of {} lines matched", matched, total);
}

fn bench_re_on_path(re: &Regex, path: &Path) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            println!("{}: {}", err, path.display());
            return;
        }
    };
    let match_all = || contents.lines().filter(|line| re.is_match(line)).count();
    // Warmup
    match_all();
    let start = Instant::now();
    for _ in 0..25 {
        match_all();
    }
    let duration = start.elapsed();
    println!("{} ms", duration.as_millis());
}

/// Run each compilation phase in turn, printing the ones requested.
fn compile_with_dumps(args: &Opt) -> Result<Regex, Error> {
    let tokens = backends::lex(&args.pattern)?;
    if args.dump_phases || args.dump_tokens {
        println!("Tokens:\n{}", backends::dump_tokens(&tokens));
    }

    let postfix = backends::to_postfix(&tokens)?;
    if args.dump_phases || args.dump_postfix {
        println!("Postfix:\n{}", backends::dump_tokens(&postfix));
    }

    let prog = backends::emit(&postfix)?;
    if args.dump_phases || args.dump_bytecode {
        println!("Bytecode:\n{}", prog);
    }
    Ok(prog.into())
}

fn main() -> Result<(), Error> {
    let args = Opt::from_args();
    let flags = args.flags.unwrap_or_default();

    let default_level = if flags.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    log::debug!("compiling {:?} with flags {:?}", args.pattern, flags.to_string());

    let re = if args.dump_phases || args.dump_tokens || args.dump_postfix || args.dump_bytecode {
        compile_with_dumps(&args)?
    } else {
        Regex::with_flags(&args.pattern, flags)?
    };

    if let Some(ref path) = args.file {
        exec_re_on_path(&re, path);
    } else if let Some(ref path) = args.bench {
        bench_re_on_path(&re, path);
    } else {
        for input in args.inputs {
            exec_re_on_string(&re, &input);
        }
    }
    Ok(())
}
