use crate::demo::{run_channel, run_demo, run_format, ChannelArgs, DemoArgs, FormatArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fire_funnel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "FIRE Funnel",
    about = "Run the FIRE retirement funnel API or inspect its channel rules from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the form fields and rules a referral channel resolves to
    Channel(ChannelArgs),
    /// Format an amount the way the results page does
    Format(FormatArgs),
    /// Walk the lead, quiz and results steps against an in-memory backend
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the lead-capture backend base URL
    #[arg(long)]
    pub(crate) backend_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Channel(args) => run_channel(args),
        Command::Format(args) => run_format(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
