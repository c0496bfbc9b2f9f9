use chrono::NaiveDate;

use golden_hour::{
    accumulate, extract, format_day, project, solar_position, Band, SimpleSolarModel, Step,
};

fn main() -> golden_hour::Result<()> {
    let latitude = 45.0;
    let date = NaiveDate::from_ymd_opt(2023, 6, 21).expect("valid date");
    let band = Band::GOLDEN_HOUR;
    let step = Step::default();

    let noon = date.and_hms_opt(12, 0, 0).expect("valid time");
    let pos = solar_position(latitude, 0.0, &noon);

    println!("=== Golden Hour Example ===");
    println!("Location: {:.1}°N, 0.0°E", latitude);
    println!("Date: {}", date);
    println!();
    println!("--- Solar Position at 12:00 ---");
    println!("Day of year: {}", pos.day_of_year);
    println!("Declination: {:.2}°", pos.declination);
    println!("Equation of Time: {:.2} minutes", pos.equation_of_time);
    println!("Altitude: {:.2}°", pos.altitude);
    println!("Azimuth: {:.2}° (0°=N, 90°=E, 180°=S)", pos.azimuth);
    println!();

    let sequence = extract(&SimpleSolarModel, date, latitude, &band, step)?;
    println!("--- Band [{}°, {}°] ---", band.min(), band.max());
    for crossing in sequence.crossings() {
        println!("{:?} at {}", crossing.kind, crossing.instant.format("%H:%M"));
    }
    println!("{}", format_day(date, &project(&sequence)));

    let total = accumulate(&SimpleSolarModel, date, latitude, &band, step)?;
    println!("Total inside band: {:.2} hours", total.hours());
    Ok(())
}
