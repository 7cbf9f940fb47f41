use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use wxdash_core::{Config, TemperatureUnit};
use wxdash_ui::input::{ParseCommandError, HELP_TEXT};
use wxdash_ui::{render, Command, Dashboard};
use wxdash_weather::{LocationSource, WeatherProvider};

#[derive(Parser)]
#[command(name = "wxdash", about = "Weather, forecast, air quality and alerts in your terminal")]
struct Cli {
    /// Config file (default: <config dir>/wxdash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Temperature unit: celsius or fahrenheit
    #[arg(short, long)]
    units: Option<TemperatureUnit>,
    /// Show this city instead of detecting the device location
    #[arg(short, long)]
    city: Option<String>,
    /// Do not detect the device location at startup
    #[arg(long)]
    no_locate: bool,
    /// Print the first result and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env is fine; the key may come from the config file.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (config, validation) = Config::load_validated(cli.config.as_deref())?;
    wxdash_core::init(&config.logging.level)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let unit = cli.units.unwrap_or(config.weather.temperature_unit);
    let provider = WeatherProvider::from_config(&config.weather)?;
    let location = if cli.no_locate {
        LocationSource::Disabled
    } else {
        LocationSource::from_config(&config.location)
    };

    let (dashboard, mut rx) = Dashboard::new(provider, location, unit);
    let mut dashboard = dashboard.with_backdrop_url(config.ui.show_backdrop_url);
    dashboard.start(cli.city.as_deref());
    tracing::info!("wxdash started");

    if cli.once {
        dashboard.settle(&mut rx).await;
        print!("{}", render(&dashboard.view(), chrono::Utc::now()));
        return Ok(());
    }

    redraw(&dashboard, None)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let mut notice = None;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => notice = Some(HELP_TEXT.to_string()),
                    Ok(command) => {
                        dashboard.apply(command);
                    }
                    Err(ParseCommandError::Empty) => {}
                    Err(e) => notice = Some(e.to_string()),
                }
            }
            Some(msg) = rx.recv() => dashboard.handle(msg),
        }
        redraw(&dashboard, notice.as_deref())?;
    }

    tracing::info!("wxdash exiting");
    Ok(())
}

fn redraw(dashboard: &Dashboard, notice: Option<&str>) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    // Clear screen, cursor home.
    write!(stdout, "\x1b[2J\x1b[H")?;
    write!(stdout, "{}", render(&dashboard.view(), chrono::Utc::now()))?;
    if let Some(notice) = notice {
        writeln!(stdout, "\n{}", notice)?;
    }
    write!(stdout, "\n> ")?;
    stdout.flush()?;
    Ok(())
}
