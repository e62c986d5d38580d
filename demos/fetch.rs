//! Fetches a URL over plain HTTP and prints the response head.
use httpmsg::{client::Client, params::Parameters, transport::TcpTransport};

fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://example.com/".to_string());

    let mut client = Client::new(TcpTransport::new());
    client.set_follow_location_header(true);

    let response = client.get(&url, &Parameters::new())?;

    println!("{} {}", response.status_code(), response.reason());

    for header in response.headers.iter() {
        println!("{}", header);
    }

    println!("{} bytes", response.body().len());

    Ok(())
}
