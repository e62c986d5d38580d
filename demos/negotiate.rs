//! Selects a response media type for a few Accept header values.
use httpmsg::{header::Accept, header::HeaderField, negotiate};

fn main() -> anyhow::Result<()> {
    let supported = ["text/html", "application/json", "*/*"];

    for accept in [
        "text/html;q=0.5, application/json;q=0.9",
        "image/*, text/plain;q=0.1",
        "application/xml",
    ] {
        let found = negotiate::negotiate(accept, &supported)?;
        println!("{:50} => {}", accept, found.unwrap_or("(none)"));
    }

    let mut header = Accept::default();
    header.set_value("text/*;q=0.3, text/html;q=0.7, text/html;level=1, */*;q=0.5")?;

    for entry in header.entries(true) {
        println!("{}", entry);
    }

    Ok(())
}
