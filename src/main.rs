use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use ni_uri::{Encoding, Ni, NiCodec, NiError, Scheme};

#[derive(Parser)]
#[command(name = "ni-cli")]
#[command(about = "Convert Named Information (RFC 6920) identifiers between their forms")]
struct Cli {
    /// Form to print each identifier in
    #[arg(short, long, value_enum, default_value = "ni")]
    to: Target,

    /// Inputs are hex-encoded binary records
    #[arg(short, long)]
    binary: bool,

    /// Inputs are hex strings; print their Luhn mod 16 check digit
    #[arg(long, conflicts_with_all = ["binary", "json"])]
    check_digit: bool,

    /// Reject nih: URIs without a check digit
    #[arg(long)]
    require_check_digit: bool,

    /// Authority for http(s) output when the identifier has none
    #[arg(short, long, default_value = "localhost")]
    authority: String,

    /// Print every form as JSON
    #[arg(long)]
    json: bool,

    /// Identifiers to convert
    #[arg(required = true)]
    inputs: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Ni,
    Nih,
    Http,
    Https,
    Binary,
}

#[derive(Serialize)]
struct Summary<'a> {
    #[serde(flatten)]
    ni: &'a Ni,
    suite_id: Option<u8>,
    ni_uri: String,
    nih_uri: String,
    http_url: String,
    https_url: String,
    binary: Option<String>,
}

fn parse_input(codec: &NiCodec, input: &str, binary: bool) -> Result<Ni, NiError> {
    if binary {
        let bytes = hex::decode(input.trim())
            .map_err(|err| NiError::InvalidInput(format!("{}: {}", input, err)))?;
        codec.parse(&bytes)
    } else {
        codec.parse(input)
    }
}

fn render(codec: &NiCodec, ni: &Ni, target: Target) -> Result<String, NiError> {
    let scheme = match target {
        Target::Ni => Scheme::Ni,
        Target::Nih => Scheme::Nih,
        Target::Http => Scheme::Http,
        Target::Https => Scheme::Https,
        Target::Binary => return Ok(hex::encode(ni.to_bytes()?)),
    };
    Ok(codec.format(ni, scheme))
}

fn summarize<'a>(codec: &NiCodec, ni: &'a Ni) -> Summary<'a> {
    Summary {
        ni,
        suite_id: ni.suite().map(|suite| suite.id()),
        ni_uri: codec.format(ni, Scheme::Ni),
        nih_uri: codec.format(ni, Scheme::Nih),
        http_url: codec.format(ni, Scheme::Http),
        https_url: codec.format(ni, Scheme::Https),
        binary: ni.to_bytes().ok().map(hex::encode),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.check_digit {
        for input in &cli.inputs {
            if let Some(c) = input.chars().find(|c| !c.is_ascii_hexdigit() && *c != '-') {
                return Err(NiError::InvalidInput(format!("'{}' is not a hex digit in {}", c, input)).into());
            }
            println!("{}\t{}", ni_uri::check_digit(input), input);
        }
        return Ok(());
    }

    let codec = NiCodec::new()
        .with_require_check_digit(cli.require_check_digit)
        .with_default_authority(cli.authority);

    for input in &cli.inputs {
        let ni = parse_input(&codec, input, cli.binary)?;
        tracing::debug!(algorithm = ni.algorithm(), digest = %ni.digest(Encoding::Hex), "parsed identifier");

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summarize(&codec, &ni))?);
        } else {
            println!("{}", render(&codec, &ni, cli.to)?);
        }
    }

    Ok(())
}
