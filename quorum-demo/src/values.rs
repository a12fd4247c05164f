use std::str::FromStr;

use quorum::parameter::ParsedValue;

use crate::error::ValueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Text,
}

impl FromStr for Format {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "text" => Ok(Self::Text),
            _ => Err(ValueError::UnknownFormat),
        }
    }
}

impl ParsedValue for Format {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

pub fn parse_header(raw: &str) -> Result<Header, ValueError> {
    let (name, value) = raw.split_once(':').ok_or(ValueError::MalformedHeader)?;
    let name = name.trim();

    match name.is_empty() {
        true => Err(ValueError::EmptyHeaderName),
        false => Ok(Header {
            name: name.to_owned(),
            value: value.trim().to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
        assert!("YAML".parse::<Format>().is_err());
    }

    #[test]
    fn headers_are_trimmed() {
        assert_eq!(
            parse_header("Accept : text/html").unwrap(),
            Header {
                name: "Accept".to_owned(),
                value: "text/html".to_owned(),
            }
        );
    }

    #[test]
    fn header_value_may_contain_colons() {
        assert_eq!(parse_header("Host:a:80").unwrap().value, "a:80");
    }

    #[test]
    fn malformed_headers() {
        assert!(matches!(
            parse_header("Accept"),
            Err(ValueError::MalformedHeader)
        ));
        assert!(matches!(
            parse_header(" :x"),
            Err(ValueError::EmptyHeaderName)
        ));
    }
}
