// Shows how a template splits into placeholders.
//
//   cargo run -p qprint-lexer --example debug_tokens -- 'v={x}, w={}'

use qprint_lexer::{pieces, Piece, TextSpan};

fn main() {
    let template = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ten: {}, hex: {x}\n".to_string());

    println!("template {:?}", template);
    println!("{:>3}  {:<9} {:<8} literal before", "#", "bytes", "modifier");

    let mut index = 0;
    let mut before: Option<TextSpan<'_>> = None;

    for piece in pieces(&template) {
        match piece {
            Ok(Piece::Literal(text)) => before = Some(text),
            Ok(Piece::Placeholder(p)) => {
                index += 1;
                let modifier = if p.modifier.is_empty() {
                    "(none)"
                } else {
                    p.modifier.as_str()
                };
                let range = format!("{}..{}", p.open, p.close + 1);
                let literal = before.take().map_or("", |t| t.as_str());
                println!("{:>3}  {:<9} {:<8} {:?}", index, range, modifier, literal);
            }
            Err(e) => {
                println!("stopped: {}", e);
                return;
            }
        }
    }

    if let Some(tail) = before {
        println!("trailing literal {:?}", tail.as_str());
    }
    println!("{} placeholder(s)", index);
}
