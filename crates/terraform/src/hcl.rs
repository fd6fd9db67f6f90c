//! `-var name=value` 인자용 HCL 리터럴 포맷팅
//!
//! Terraform은 복합 타입 변수의 `-var` 값을 HCL 표현식으로, 그 외에는 원시 문자열로 해석합니다.
//! 따라서 최상위 문자열은 따옴표 없이 전달하고,
//! 리스트나 맵 안의 문자열은 따옴표로 감싸 이스케이프합니다.

use serde_json::Value;

/// `-var` 인자용 `name=value` 한 쌍을 생성합니다.
pub fn format_var(name: &str, value: &Value) -> String {
    format!("{name}={}", to_hcl(value, false))
}

/// JSON 값을 HCL 리터럴로 변환합니다.
pub fn to_hcl(value: &Value, nested: bool) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if nested => quote(s),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(|v| to_hcl(v, true)).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} = {}", quote(k), to_hcl(v, true)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // `${`, `%{`는 템플릿 시퀀스로 해석됨
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
