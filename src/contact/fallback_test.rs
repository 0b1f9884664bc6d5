use super::*;

#[test]
fn mailto_uri_encodes_subject_and_body() {
    let uri = mailto_uri("hello@example.com", "Portfolio Contact from", "Jo", "jo@example.com", "hi");
    assert_eq!(
        uri,
        "mailto:hello@example.com?subject=Portfolio%20Contact%20from%20Jo\
         &body=Name%3A%20Jo%0AEmail%3A%20jo%40example.com%0A%0AMessage%3A%0Ahi"
    );
}

#[test]
fn mailto_uri_escapes_query_delimiters_in_user_input() {
    let uri = mailto_uri("me@site.dev", "Hi", "A&B=C?", "x@y.z", "50% off #1");
    let (_, query) = uri.split_once('?').unwrap();
    let params = query.split('&').collect::<Vec<_>>();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0], "subject=Hi%20A%26B%3DC%3F");
    assert!(params[1].ends_with("50%25%20off%20%231"));
}

#[test]
fn mailto_uri_encodes_non_ascii() {
    let uri = mailto_uri("me@site.dev", "From", "Zoë", "z@e.io", "ça va");
    assert!(uri.contains("subject=From%20Zo%C3%AB"));
    assert!(uri.ends_with("%C3%A7a%20va"));
}
