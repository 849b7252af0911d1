use std::io::Write;

use meteo_summary::{AggregateError, Direction, ErrorKind, WeatherFile};
use tempfile::NamedTempFile;

fn write_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{line}").expect("Failed to write temp file");
    }
    file.flush().expect("Failed to flush temp file");
    file
}

#[test]
fn process_file() {
    let file = write_file(&[
        "Estacion: Centro, Latitud: -34.6, Longitud: -58.4, Fecha: 2023-05-01, Hora: 10:30, Temperatura: 18.0, Humedad: 70, Presion: 1013.0, Viento: 12.0,NE",
        "",
        "Estacion: Centro, Latitud: -34.6, Longitud: -58.4, Fecha: 2023-05-01, Hora: 11:30, Temperatura: 20.0, Humedad: 60, Presion: 1011.0, Viento: 8.0,NE",
        "Estacion: Puerto, Latitud: -34.5, Longitud: -58.3, Fecha: 2023-05-01, Hora: 12:30, Temperatura: 22.0, Humedad: 50, Presion: 1009.0, Viento: 4.0,SSW",
    ]);

    let weather = WeatherFile::new(file.path());
    let summary = weather.process().unwrap();

    assert_eq!(summary.readings, 3);
    assert_eq!(summary.temperature, 20.0);
    assert_eq!(summary.humidity, 60.0);
    assert_eq!(summary.pressure, 1011.0);
    assert_eq!(summary.wind_speed, 8.0);
    assert_eq!(summary.wind_direction, Direction::NE);
    assert_eq!(summary.into_tuple(), (20.0, 60.0, 1011.0, 8.0, 45.0));

    // no state is kept between calls
    assert_eq!(weather.process().unwrap(), summary);
}

#[test]
fn windows_line_endings() {
    let file = write_file(&[
        "Estacion: A, Latitud: 1, Longitud: 2, Fecha: 2023-05-01, Hora: 10:30, Temperatura: 1.5, Humedad: 2, Presion: 3, Viento: 4,W\r",
        "\r",
    ]);

    let summary = WeatherFile::new(file.path()).process().unwrap();
    assert_eq!(summary.readings, 1);
    assert_eq!(summary.wind_direction_degrees(), 270.0);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.txt");

    let err = WeatherFile::new(&path).process().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::File);
    assert_eq!(err.path(), path.as_path());
    match err {
        AggregateError::Io { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        err => panic!("unexpected error {err:?}"),
    }
}

#[test]
fn empty_file() {
    let file = write_file(&[]);
    let err = WeatherFile::new(file.path()).process().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Empty);

    let file = write_file(&["", "   ", "\t"]);
    let err = WeatherFile::new(file.path()).process().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Empty);
}

#[test]
fn truncated_line_is_reported_with_its_number() {
    let file = write_file(&[
        "Estacion: A, Latitud: 1, Longitud: 2, Fecha: 2023-05-01, Hora: 10:30, Temperatura: 1.5, Humedad: 2, Presion: 3, Viento: 4,W",
        "Estacion: A, Latitud: 1, Longitud: 2, Fecha: 2023-05-01",
    ]);

    let err = WeatherFile::new(file.path()).process().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Content);
    assert_eq!(err.line(), Some(2));
    assert!(err.to_string().contains("Missing time field"), "{err}");
}

#[test]
fn invalid_utf8_line_is_reported_with_its_number() {
    let mut file = write_file(&[
        "Estacion: A, Latitud: 1, Longitud: 2, Fecha: 2023-05-01, Hora: 10:30, Temperatura: 1.5, Humedad: 2, Presion: 3, Viento: 4,W",
    ]);
    file.write_all(b"Estacion: \xF1, Latitud: 1\n").unwrap();
    file.flush().unwrap();

    let err = WeatherFile::new(file.path()).process().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Content);
    assert_eq!(err.line(), Some(2));
    assert!(err.to_string().contains("not valid UTF-8"), "{err}");
}
