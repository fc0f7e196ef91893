use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use rotor_config::{SettingsSource, WheelSettings};
use rotor_core::{
    DriverOutput, HostEvent, HostRequest, JoinTable, PositionMapper, Wheel,
    WheelDriver, WheelId, WheelRegistry, WheelTiming,
};
use rotor_model::{DataSet, VirtualIndex, WheelConfig, WheelStyle};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "rotor-preview",
    about = "Scroll a period/hour/minute clock to a time and print what settles"
)]
struct Cli {
    /// Settings file (TOML or JSON). Falls back to the ROTOR_* environment.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u8).range(1..=12))]
    hour: u8,
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(0..=59))]
    minute: u8,
    #[arg(long, value_enum, default_value = "am")]
    period: Period,
    /// Row height reported to the wheels, in pixels.
    #[arg(long, default_value_t = 48.0)]
    extent: f32,
    /// Print the effective settings as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Period {
    Am,
    Pm,
}

impl Period {
    fn index(self) -> usize {
        match self {
            Period::Am => 0,
            Period::Pm => 1,
        }
    }
}

fn labels(range: impl Iterator<Item = u32>) -> Result<DataSet<String>> {
    DataSet::new(range.map(|n| format!("{n:02}")).collect())
        .context("empty label range")
}

/// Hours shown by the dependent wheel for each period, in 24h form.
fn hour_table() -> Result<JoinTable<String>> {
    let mut table = JoinTable::new();
    table.insert("AM".to_string(), labels(0..12)?);
    table.insert("PM".to_string(), labels(12..24)?);
    Ok(table)
}

struct Clock {
    period: WheelId,
    hour: WheelId,
    minute: WheelId,
    mappers: HashMap<WheelId, PositionMapper>,
}

fn build(
    config: WheelConfig,
    timing: WheelTiming,
    style: WheelStyle,
) -> Result<(WheelRegistry<String>, Clock)> {
    let fixed = WheelConfig::new(config.window_size);
    let periods = DataSet::new(vec!["AM".to_string(), "PM".to_string()])
        .context("empty period data")?;

    let mut registry = WheelRegistry::new();
    let period = registry.insert(
        Wheel::with_timing(fixed, timing)
            .with_style(style)
            .with_data(periods),
    );
    let hour = registry.insert(
        Wheel::with_timing(fixed, timing)
            .with_style(style)
            .with_data(labels(0..12)?),
    );
    let minute = registry.insert(
        Wheel::with_timing(config, timing)
            .with_style(style)
            .with_data(labels(0..60)?),
    );
    registry.join(period, hour)?;
    registry.set_join_data(period, hour_table()?)?;

    let mappers = [period, hour, minute]
        .into_iter()
        .filter_map(|id| registry.get(id).map(|w| (id, *w.mapper())))
        .collect();
    Ok((
        registry,
        Clock {
            period,
            hour,
            minute,
            mappers,
        },
    ))
}

/// Stand-in for the host list: remembers where each wheel was told to jump
/// and replays scrolls from there.
struct ScriptedHost {
    events: UnboundedSender<HostEvent<String>>,
    outputs: UnboundedReceiver<DriverOutput<String>>,
    tops: HashMap<WheelId, VirtualIndex>,
    extent: f32,
    failures: Vec<String>,
}

impl ScriptedHost {
    fn send(&self, event: HostEvent<String>) -> Result<()> {
        self.events.send(event).context("driver stopped early")
    }

    fn pump(&mut self) {
        while let Ok(output) = self.outputs.try_recv() {
            match output {
                DriverOutput::Request {
                    wheel,
                    request: HostRequest::JumpTo(first),
                } => {
                    self.tops.insert(wheel, first);
                }
                DriverOutput::Request { .. } => {}
                DriverOutput::Settled(settled) => info!(
                    wheel = %settled.wheel,
                    index = settled.selection.index,
                    item = %settled.selection.item,
                    "settled"
                ),
                DriverOutput::Activated { .. } => {}
                DriverOutput::Failed(err) => {
                    warn!(error = %err, "driver reported a failure");
                    self.failures.push(err.to_string());
                }
            }
        }
    }

    /// Drag `wheel` row by row to `target`, then let it rest there.
    fn scroll(&mut self, wheel: WheelId, target: VirtualIndex) -> Result<()> {
        let mut top = self.tops.get(&wheel).copied().unwrap_or(target);
        let step = (target.value() - top.value()).signum();
        while top != target {
            top = top.offset(step);
            self.send(HostEvent::Scrolled {
                wheel,
                offset: -self.extent / 3.0,
                first_visible: top,
            })?;
        }
        self.send(HostEvent::ScrollStopped {
            wheel,
            offset: 0.0,
            first_visible: target,
        })?;
        self.tops.insert(wheel, target);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let (mut settings, source) = match &cli.config {
        Some(path) => (
            WheelSettings::load_from_file(path)?,
            SettingsSource::File(path.clone()),
        ),
        None => WheelSettings::load_from_env()?,
    };
    if cli.config.is_some() {
        settings.apply_env_overrides()?;
    }
    info!(%source, "using wheel settings");

    if cli.print_config {
        print!("{}", settings.to_toml_string()?);
        return Ok(());
    }

    let (config, timing, style) = settings.validate()?;
    let (registry, clock) = build(config, timing, style)?;
    let (driver, events, outputs) = WheelDriver::channel(registry);

    let settle = timing.commit_delay + timing.reset_delay + Duration::from_millis(50);
    let extent = cli.extent;
    let plan = [
        (clock.period, cli.period.index(), 2),
        (clock.hour, usize::from(cli.hour % 12), 12),
        (clock.minute, usize::from(cli.minute), 60),
    ];
    let (period, hour, minute) = (clock.period, clock.hour, clock.minute);

    let script = async move {
        let mut host = ScriptedHost {
            events,
            outputs,
            tops: HashMap::new(),
            extent,
            failures: Vec::new(),
        };
        for wheel in [period, hour, minute] {
            host.send(HostEvent::ItemExtent { wheel, px: extent })?;
        }
        // let the driver flush the initial jumps
        tokio::time::sleep(Duration::from_millis(5)).await;
        host.pump();

        for (wheel, index, len) in plan {
            let mapper = clock
                .mappers
                .get(&wheel)
                .context("wheel has no mapper")?;
            let target = mapper.first_visible_for(index, len)?;
            host.scroll(wheel, target)?;
            // period commits, then the hour wheel resets and re-commits
            tokio::time::sleep(settle * 2).await;
            host.pump();
        }

        host.send(HostEvent::Shutdown)?;
        anyhow::Ok(host.failures)
    };

    let (registry, failures) = tokio::join!(driver.run(), script);
    let failures = failures?;
    if !failures.is_empty() {
        bail!("preview failed: {}", failures.join("; "));
    }

    let pick = |id: WheelId| {
        registry
            .get(id)
            .and_then(|w| w.current_selection())
            .map(|s| s.item.clone())
            .unwrap_or_else(|| "--".to_string())
    };
    println!("{}:{} ({})", pick(hour), pick(minute), pick(period));
    Ok(())
}
