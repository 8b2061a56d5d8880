use std::io::Read;
use std::process::ExitCode;

use birdiescript::{Capabilities, NoopTracer, Runner, RunnerOptions, StderrTracer, Value};
use clap::Parser;

/// `bs`: the Birdiescript command-line driver.
#[derive(Parser, Debug)]
#[command(name = "bs", version, about = "Run Birdiescript programs")]
struct Cli {
    /// Script file to run; omit or pass `-` to read from stdin.
    file: Option<String>,

    /// Run CMD directly instead of reading a file.
    #[arg(short = 'c', long = "command")]
    command: Option<String>,

    /// Print a step-by-step dispatch trace to stderr.
    #[arg(short = 'd')]
    debug: bool,

    /// Input encoding, pre-bound for `%f`-style formatting built-ins.
    #[arg(short = 'e', long = "encoding", default_value = "utf-8")]
    encoding: String,

    /// Recursion budget (Context nesting depth).
    #[arg(short = 'm', long = "max-depth", default_value_t = 1024)]
    max_depth: usize,

    /// Drop into a line-oriented REPL instead of running a script.
    #[arg(short = 'r')]
    repl: bool,

    /// Verbose: print the version banner before running.
    #[arg(short = 'v')]
    verbose: bool,

    /// Trailing arguments bound to the pre-bound name `A`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        eprintln!("bs {}", env!("CARGO_PKG_VERSION"));
    }

    if cli.repl {
        return run_repl(&cli);
    }

    let source = match load_source(&cli) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("bs: {message}");
            return ExitCode::from(2);
        }
    };

    let options = RunnerOptions {
        max_depth: cli.max_depth,
        encoding: cli.encoding.clone(),
        tracer: tracer_for(cli.debug),
    };

    let mut runner = match Runner::new(&source, Capabilities::std(), options) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("bs: {err}");
            return ExitCode::from(1);
        }
    };
    bind_args(&mut runner, &cli.args);

    match runner.run() {
        Ok(_stack) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bs: {err}");
            ExitCode::from(1)
        }
    }
}

fn tracer_for(debug: bool) -> Box<dyn birdiescript::tracer::Tracer> {
    if debug {
        Box::new(StderrTracer)
    } else {
        Box::new(NoopTracer)
    }
}

fn load_source(cli: &Cli) -> Result<String, String> {
    if let Some(cmd) = &cli.command {
        return Ok(cmd.clone());
    }
    match cli.file.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("reading stdin: {e}"))?;
            Ok(buf)
        }
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}")),
    }
}

fn bind_args(runner: &mut Runner, args: &[String]) {
    let values = args.iter().map(|a| Value::str(a.clone())).collect();
    runner.define_global("A", Value::list(values));
}

fn run_repl(cli: &Cli) -> ExitCode {
    let options = RunnerOptions {
        max_depth: cli.max_depth,
        encoding: cli.encoding.clone(),
        tracer: tracer_for(cli.debug),
    };
    let mut runner = match Runner::new("", Capabilities::std(), options) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("bs: {err}");
            return ExitCode::from(1);
        }
    };
    bind_args(&mut runner, &cli.args);

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        let n = match stdin.read_line(&mut line) {
            Ok(n) => n,
            Err(err) => {
                eprintln!("bs: {err}");
                return ExitCode::from(1);
            }
        };
        if n == 0 {
            return ExitCode::SUCCESS;
        }
        match runner.run_line(&line) {
            Ok(stack) => {
                let rendered: Vec<String> = stack.iter().map(ToString::to_string).collect();
                println!("[{}]", rendered.join(" "));
            }
            Err(err) => eprintln!("bs: {err}"),
        }
    }
}
