use clap::Args;
use colored::Colorize;
use eyre::Result;
use simwatch_console::{init_tracing, render_log, Format, LogTarget, Payload, Session, SessionConfig};
use std::time::Duration;

use super::EndpointArgs;

const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Milliseconds to keep logging incoming messages after the last request
    #[arg(long, default_value = "1000")]
    pub wait_ms: u64,

    /// Milliseconds to wait for the connection to open
    #[arg(long, default_value = "3000")]
    pub connect_timeout_ms: u64,

    /// Output format: table, json or json-pretty
    #[arg(long, default_value = "table")]
    pub format: Format,

    /// Requests in send order: bounds:SWLAT,SWLNG,NELAT,NELNG | pilots:QUERY |
    /// airports:true|false | sub:ID | unsub:ID
    #[arg(required = true, allow_hyphen_values = true)]
    pub requests: Vec<Payload>,
}

impl SendArgs {
    pub fn run(&self) -> Result<()> {
        init_tracing(&self.endpoint.log_target(LogTarget::Stderr))?;

        let config = SessionConfig::new(&self.endpoint.url)?;
        let mut session = Session::connect(&config)?;

        if let Err(e) = session.wait_open(Duration::from_millis(self.connect_timeout_ms)) {
            let log = session.close(CLOSE_GRACE);
            println!("{}", render_log(config.url(), &log, self.format)?);
            eprintln!("{}", format!("✗ {}", e).red().bold());
            return Err(e.into());
        }

        let total = self.requests.len();
        let failed = self
            .requests
            .iter()
            .filter(|payload| session.submit((*payload).clone()).is_err())
            .count();

        session.collect_for(Duration::from_millis(self.wait_ms));

        let log = session.close(CLOSE_GRACE);
        println!("{}", render_log(config.url(), &log, self.format)?);

        if failed > 0 {
            eprintln!(
                "{}",
                format!("✗ {} of {} requests were not sent", failed, total)
                    .red()
                    .bold()
            );
            eyre::bail!("{} of {} requests were not sent", failed, total);
        }

        eprintln!("{}", format!("✓ {} requests sent", total).green());
        Ok(())
    }
}
