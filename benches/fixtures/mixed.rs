// Greetings table with right-to-left literals.
/* שלום /* nested */ עולם */
const GREETINGS: [(&str, &str); 3] = [
    ("he", "שלום"),
    ("ar", "مرحبا"),
    ("en", "hello"),
];

fn lookup(code: &str) -> Option<&'static str> {
    GREETINGS.iter().find(|(c, _)| *c == code).map(|(_, g)| *g)
}

fn main() {
    let שם = "עולם";
    let total = שם.len() + 42;
    let raw = r#"قيمة "مقتبسة""#;
    println!("{} {} {}", lookup("ar").unwrap_or("?"), total, raw);
    let pair = ('ح', b'x');
    let _ = (pair, [ح, 1.5e3]);
}
