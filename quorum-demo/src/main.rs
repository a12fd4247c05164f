mod error;
mod values;

use std::{
    io::{self, Write},
    num::NonZeroU32,
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context as _;
use quorum::{Constraint, LoadedArguments, Parser, SpecId, Switch, Value, ValueId};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crate::values::{Format, Header, parse_header};

const HELP_WIDTH: usize = 80;
const MAX_JOBS: u32 = 64;

struct Arguments {
    help: SpecId,
    verbose: SpecId,
    jobs: ValueId<NonZeroU32>,
    urls: ValueId<String>,
    output: ValueId<PathBuf>,
    format: ValueId<Format>,
    user: ValueId<String>,
    password: ValueId<String>,
    headers: ValueId<Header>,
}

impl Arguments {
    fn declare(parser: &mut Parser) -> Self {
        let help = parser.add(Switch::new().short('h').long("help").help("Print this message"));
        let verbose = parser.add(
            Switch::new()
                .short('v')
                .long("verbose")
                .unbounded()
                .help("Print more about what's happening; repeat for even more"),
        );
        let jobs = parser.add(
            Value::<NonZeroU32>::new()
                .short('j')
                .long("jobs")
                .placeholder("N")
                .default_value(NonZeroU32::MIN)
                .check_value(|jobs: &NonZeroU32| match jobs.get() {
                    ..=MAX_JOBS => Ok(()),
                    _ => Err(format!("at most {MAX_JOBS} downloads can run at once")),
                })
                .help("How many downloads to run at once"),
        );
        let urls = parser.add(
            Value::<String>::new()
                .placeholder("URL")
                .required()
                .unbounded()
                .help("What to fetch"),
        );

        let output_group = parser.group("Output");
        let output = parser.add_to(
            output_group,
            Value::<PathBuf>::new()
                .short('o')
                .long("output")
                .placeholder("DIR")
                .help("Directory to save downloads in"),
        );
        let stdout = parser.add_to(
            output_group,
            Switch::new()
                .long("stdout")
                .help("Write downloads to standard output"),
        );
        let format = parser.add_to(
            output_group,
            Value::<Format>::new()
                .short('f')
                .long("format")
                .placeholder("FORMAT")
                .default_value(Format::Text)
                .help("Report format: json, yaml or text"),
        );

        let auth_group = parser.group("Authentication");
        let user = parser.add_to(
            auth_group,
            Value::<String>::new()
                .short('u')
                .long("user")
                .placeholder("NAME")
                .help("User to log in as"),
        );
        let password = parser.add_to(
            auth_group,
            Value::<String>::new()
                .long("password")
                .placeholder("SECRET")
                .help("Password for --user"),
        );
        let headers = parser.add_to(
            auth_group,
            Value::with_parser(parse_header)
                .short('H')
                .long("header")
                .placeholder("NAME:VALUE")
                .unbounded()
                .help("Extra request header; may be repeated"),
        );

        parser.constrain(Constraint::exactly_one_of().arg(output).arg(stdout));
        parser.constrain(Constraint::implies().arg(password).arg(user));

        Self {
            help,
            verbose,
            jobs,
            urls,
            output,
            format,
            user,
            password,
            headers,
        }
    }

    fn report(&self, parser: &Parser, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "verbosity: {}", parser.count(self.verbose))?;
        if let Some(jobs) = parser.value(self.jobs) {
            writeln!(out, "jobs: {jobs}")?;
        }

        match parser.value(self.output) {
            Some(dir) => writeln!(out, "destination: {}", dir.display())?,
            None => writeln!(out, "destination: <stdout>")?,
        }

        if let Some(format) = parser.value(self.format) {
            writeln!(out, "format: {format:?}")?;
        }

        if let Some(user) = parser.value(self.user) {
            let password = match parser.is_set(self.password) {
                true => "given",
                false => "not given",
            };

            writeln!(out, "user: {user} (password {password})")?;
        }

        parser
            .values(self.headers)
            .iter()
            .try_for_each(|header| writeln!(out, "header: {}={}", header.name, header.value))?;

        parser
            .values(self.urls)
            .iter()
            .try_for_each(|url| writeln!(out, "fetch: {url}"))
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let loaded = LoadedArguments::from_env();
    let program = match loaded.argv0().rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name,
        _ => "quorum-demo",
    };

    let mut parser = Parser::new(program).with_description(
        "Fetch one or more URLs. Nothing is actually downloaded; the parsed \
        arguments are printed instead.",
    );
    let arguments = Arguments::declare(&mut parser);
    let result = loaded.parse_into(&mut parser);

    if parser.is_set(arguments.help) {
        print!("{}", parser.help_wrapped(HELP_WIDTH));
        return Ok(ExitCode::SUCCESS);
    }

    if let Err(error) = result {
        warn!(%error, "rejected command line");
        eprintln!("{program}: {error}\n");
        eprint!("{}", parser.help_wrapped(HELP_WIDTH));
        return Ok(ExitCode::FAILURE);
    }

    debug!(verbosity = parser.count(arguments.verbose), "parsed command line");

    arguments
        .report(&parser, &mut io::stdout().lock())
        .context("failed to write to stdout")?;

    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
