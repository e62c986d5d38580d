use std::{io::Write, path::Path, time::Duration};

use anyhow::Context;

use crate::{
    client::Client,
    cookie_jar::CookieJar,
    header::Header,
    message::Request,
    transport::TcpTransport,
};

use super::arg::FetchCommand;

pub fn fetch(args: &FetchCommand) -> anyhow::Result<()> {
    let mut client = Client::new(TcpTransport::new());
    client.set_follow_location_header(args.follow);
    client.set_max_redirects(args.max_redirects);
    client.set_proxy(args.proxy.clone());
    client.set_timeout(args.timeout.map(Duration::from_secs));

    if let Some(path) = &args.cookie_jar {
        client.set_cookie_jar(Some(load_cookie_jar(path)?));
    }

    let mut request = Request::new(Request::METHOD_GET, &args.url).context("invalid URL")?;

    for line in &args.header {
        let header = Header::parse_line(line)
            .with_context(|| format!("malformed header '{}'", line))?
            .with_context(|| format!("not a header line '{}'", line))?;
        request.headers.add(header);
    }

    let mut output = super::io::open_output(&args.output)?;

    let response = if args.include {
        let response = client.request(&mut request)?;
        let mut head = response.clone();
        head.clear_body();
        output.write_all(&head.to_bytes())?;
        output.write_all(response.body())?;
        response
    } else {
        client.request_to(&mut request, Some(&mut output as &mut dyn Write))?
    };

    output.flush()?;

    tracing::info!(status = response.status_code(), "fetched");

    if let (Some(path), Some(jar)) = (&args.cookie_jar, client.cookie_jar()) {
        save_cookie_jar(path, jar)?;
    }

    Ok(())
}

fn load_cookie_jar(path: &Path) -> anyhow::Result<CookieJar> {
    if !path.exists() {
        return Ok(CookieJar::new());
    }

    let file = std::fs::File::open(path).context("opening cookie jar failed")?;
    let jar = serde_json::from_reader(std::io::BufReader::new(file))
        .context("reading cookie jar failed")?;

    Ok(jar)
}

fn save_cookie_jar(path: &Path, jar: &CookieJar) -> anyhow::Result<()> {
    let file = std::fs::File::create(path).context("creating cookie jar failed")?;
    serde_json::to_writer_pretty(file, jar).context("writing cookie jar failed")?;

    Ok(())
}
