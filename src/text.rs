/// Replace named and numeric HTML character references with the characters
/// they stand for. Unknown references are left as they are.
pub fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}
