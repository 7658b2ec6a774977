use posix_bridge::{ConvertRequest, UtcOffset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let converter = posix_bridge::spawn(UtcOffset::UTC);

    let requests = [
        ConvertRequest { year: 1970, month: 1, day: 1, hour: 0, minute: 0 },
        ConvertRequest { year: 2024, month: 2, day: 29, hour: 12, minute: 0 },
        ConvertRequest { year: 1969, month: 12, day: 31, hour: 23, minute: 59 },
        ConvertRequest { year: 1900, month: 2, day: 29, hour: 0, minute: 0 },
        ConvertRequest { year: 2023, month: 4, day: 31, hour: 0, minute: 0 },
    ];

    for request in requests {
        match converter.convert(request).await {
            Ok(timestamp) => eprintln!("{request:?} -> {timestamp}"),
            Err(err) => eprintln!("{request:?} -> {err}"),
        }
    }

    Ok(())
}
