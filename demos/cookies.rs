//! Stores cookies from responses and attaches them to later requests.
use httpmsg::{
    cookie_jar::CookieJar,
    header::SetCookie,
    message::{Request, Response},
};

fn main() -> anyhow::Result<()> {
    let mut jar = CookieJar::new();

    let request = Request::new(Request::METHOD_GET, "http://www.example.com/login")?;
    let mut response = Response::new();
    response.add_cookie(SetCookie::new("session", "a b;c").with_path("/"));
    response.add_cookie(SetCookie::new("theme", "dark").with_domain("example.com"));
    print!("{}", response);

    jar.extract_cookies(&request, &response);

    let mut next = Request::new(Request::METHOD_GET, "http://www.example.com/home")?;
    jar.append_cookies(&mut next);
    print!("{}", next);

    println!("{}", serde_json::to_string_pretty(&jar)?);

    Ok(())
}
