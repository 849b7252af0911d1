use meteo_summary::WeatherFile;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt::init();

    let file = std::env::args()
        .nth(1)
        .ok_or_else(|| miette::miette!("Missing filename"))?;
    println!("opening {file}");

    let summary = WeatherFile::new(file).process()?;
    println!("{summary}");

    Ok(())
}
