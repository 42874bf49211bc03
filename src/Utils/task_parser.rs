/// parse task document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values into HashMap<String, HashMap<String, Option<Vec<Value>>>>.
/// Values with spaces must be double-quoted: name: "Laplace 2d"
/// Lines starting with //, # or % are comments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// floats and integers alike
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

/// identifier: letter or underscore followed by letters, digits, underscores
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// Parses a title; trailing whitespace and newlines are dropped
fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = parse_identifier(input)?;
    Ok((input.trim_start(), result))
}

fn parse_key(input: &str) -> IResult<&str, String> {
    parse_identifier(input)
}

fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let mut parser = map(
        delimited(char('"'), take_while(|c: char| c != '"' && c != '\n'), char('"')),
        |s: &str| Value::String(s.to_string()),
    );
    parser.parse(input)
}

fn parse_bare(input: &str) -> IResult<&str, Value> {
    // excluding commas, whitespace, newlines, and semicolons
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare)).parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// Parses `key: value, value`
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim_start(), result))
}

/// Parses a section with a title and one or more key-value pairs
fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Filters out comment lines (starting with //, #, or %) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire (comment-free) document into a HashMap
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;

    let mut result: DocumentMap = HashMap::new();
    for (title, section_map) in sections {
        let entry: &mut SectionMap = result.entry(title).or_default();
        for (key, values) in section_map {
            entry.insert(key, Some(values));
        }
    }
    Ok((input, result))
}

/// Parses a whole task document: comments dropped, nothing may remain unparsed
pub fn parse_task_document(input: &str) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    match parse_document(&filtered) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            Ok(parsed)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title_and_key() {
        let (remaining, title) = parse_title("animation\n t_cutoff: 0.6").unwrap();
        assert_eq!(title, "animation");
        assert_eq!(remaining, "t_cutoff: 0.6");

        let (remaining, key) = parse_key("output_dir: plots").unwrap();
        assert_eq!(key, "output_dir");
        assert_eq!(remaining, ": plots");
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("10, 3").unwrap().1, Value::Integer(10));
        assert_eq!(parse_value("0.6").unwrap().1, Value::Float(0.6));
        assert_eq!(parse_value("true").unwrap().1, Value::Boolean(true));
        assert_eq!(
            parse_value("data/time.txt\n").unwrap().1,
            Value::String("data/time.txt".to_string())
        );
        let (remaining, v) = parse_value("\"Laplace 2d\" rest").unwrap();
        assert_eq!(v, Value::String("Laplace 2d".to_string()));
        assert_eq!(remaining, " rest");
    }

    #[test]
    fn test_parse_value_list() {
        let (_, values) = parse_value_list("800, 600").unwrap();
        assert_eq!(values, vec![Value::Integer(800), Value::Integer(600)]);
    }

    #[test]
    fn test_parse_document_sections() {
        let input = "data\n time: data/time.txt\n field: data/temp.txt\nanimation\n t_cutoff: 0.6\n fps: 10\n";
        let doc = parse_task_document(input).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc["data"]["time"].as_ref().unwrap()[0],
            Value::String("data/time.txt".to_string())
        );
        assert_eq!(doc["animation"]["fps"].as_ref().unwrap()[0].as_f64(), Some(10.0));
    }

    #[test]
    fn test_comments_are_skipped() {
        let input = "# render task\nmodel\n // the model\n name: \"Heat eq\"\n % alpha\n alpha: 0.05\n";
        let doc = parse_task_document(input).unwrap();
        assert_eq!(
            doc["model"]["name"].as_ref().unwrap()[0].as_string().unwrap(),
            "Heat eq"
        );
        assert_eq!(doc["model"]["alpha"].as_ref().unwrap()[0], Value::Float(0.05));
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_task_document("animation\n fps 12\n").is_err());
        assert!(parse_task_document("").is_err());
    }
}
