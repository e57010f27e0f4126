use chrono::Utc;
use gnsstime::{BasicTimeSystemConverter, CommonTime, TimeSystem};

fn main() -> Result<(), gnsstime::Error> {
    let conv = BasicTimeSystemConverter::new();

    let utc = CommonTime::from_utc(Utc::now())?;
    let gps = utc.to_time_system(TimeSystem::GPS, &conv)?;
    let tdb = utc.to_time_system(TimeSystem::TDB, &conv)?;

    println!("UTC: {utc}");
    println!("GPS: {gps}");
    println!("GPS − UTC: {}", gps.difference(&utc));
    println!("MJD(TDB): {}", tdb.modified_julian_date());
    if let Some(doy) = gps.format("%Y-%j %H:%M:%S%.3f") {
        println!("GPS day of year: {doy}");
    }
    Ok(())
}
