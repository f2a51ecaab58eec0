use anyhow::Result;
use board::SitlBoard;
use config::SitlConfig;

mod board;
mod config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SitlConfig::from_env()?;
    log::debug!("config: {:?}", config);

    let mut board = SitlBoard::new(&config);
    log::info!("Initializing {} board", board.name());
    board.bring_up(config.gnss_mode)?;

    for tick in 0..config.ticks {
        if tick > 0 {
            std::thread::sleep(config.tick_interval);
            board.step();
        }

        let fix = board.poll()?;
        log::info!(
            "tick {}: {} {} UTC  lat {:.6}  lon {:.6}  sats {}",
            tick,
            fix.date,
            fix.time,
            fix.position.latitude,
            fix.position.longitude,
            fix.satellites,
        );
    }

    let gps = board.driver();
    let mode = gps.get_gnss_mode()?;
    log::info!("last fix {} {} UTC, mode {}", gps.get_date(), gps.get_utc_time(), mode);

    board.shut_down()?;
    log::info!("Stopping");
    Ok(())
}
