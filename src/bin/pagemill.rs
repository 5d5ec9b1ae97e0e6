use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use pagemill::{artifact, convert_bytes, Options};

const USAGE: &str = "\
Usage: pagemill [OPTIONS] <input.html | ->

Convert an HTML file (or stdin with `-`) to cleaned Markdown.

Options:
  --url <URL>        Source URL; used for link rewriting and output naming
  --charset <LABEL>  Character encoding hint, overrides in-document sniffing
  --config <FILE>    JSON file with pipeline options
  --out <DIR>        Write <stem>.md into DIR instead of stdout; keeps the
                     raw HTML next to it when the output is low confidence
  -h, --help         Show this help
";

struct Args {
    input: String,
    url: Option<String>,
    charset: Option<String>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut input = None;
    let mut url = None;
    let mut charset = None;
    let mut config = None;
    let mut out = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            "--url" => url = Some(args.next().ok_or("--url requires a value")?),
            "--charset" => charset = Some(args.next().ok_or("--charset requires a value")?),
            "--config" => {
                config = Some(PathBuf::from(args.next().ok_or("--config requires a value")?));
            }
            "--out" => out = Some(PathBuf::from(args.next().ok_or("--out requires a value")?)),
            other if other.starts_with("--") => {
                return Err(format!("unknown option: {other}").into());
            }
            other => {
                if input.replace(other.to_string()).is_some() {
                    return Err("more than one input given".into());
                }
            }
        }
    }

    let input = input.ok_or(USAGE)?;
    Ok(Args { input, url, charset, config, out })
}

fn load_options(args: &Args) -> Result<Options, Box<dyn Error>> {
    let mut opts = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => Options::default(),
    };

    // The command line wins over the config file.
    if args.url.is_some() && opts.base_url.is_none() {
        opts.base_url.clone_from(&args.url);
    }
    Ok(opts)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = parse_args()?;
    let opts = load_options(&args)?;

    let raw = if args.input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(&args.input).map_err(|e| format!("cannot read {}: {e}", args.input))?
    };

    let result = convert_bytes(&raw, args.charset.as_deref(), &opts)?;

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    match &args.out {
        Some(dir) => {
            let stem = artifact::derive_stem(args.url.as_deref(), result.title.as_deref());
            let raw_text = String::from_utf8_lossy(&raw);
            let path = artifact::persist(dir, &stem, &result, &raw_text)?;
            eprintln!("{}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(result.markdown.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
