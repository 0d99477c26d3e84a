use std::io::{BufRead, BufReader, Read};

use csv_core::ReadFieldResult;

use crate::errors::Result;

const BOM: char = '\u{feff}';

/// Splits a row of a tab-separated table into its fields.
///
/// Quoting is disabled, so `"` is an ordinary character of a word.
pub fn parse_tsv_row(row: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut rdr = csv_core::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .build();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    let mut field = vec![];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        field.extend_from_slice(&output[..nout]);
        bytes = &bytes[nin..];
        let end = match result {
            ReadFieldResult::OutputFull => continue,
            ReadFieldResult::Field { record_end } => record_end,
            ReadFieldResult::InputEmpty => true,
            ReadFieldResult::End => break,
        };
        fields.push(String::from_utf8_lossy(&field).into_owned());
        field.clear();
        if end {
            break;
        }
    }
    fields
}

/// Reads non-empty lines with their 1-based line numbers.
///
/// A byte order mark and trailing line terminators are removed.
pub fn read_lines<R>(rdr: R) -> impl Iterator<Item = Result<(usize, String)>>
where
    R: Read,
{
    BufReader::new(rdr)
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) => {
                let line = line.replace(BOM, "");
                let line = line.trim_end_matches(['\r', '\n']);
                if line.trim().is_empty() {
                    None
                } else {
                    Some(Ok((i + 1, line.to_string())))
                }
            }
            Err(e) => Some(Err(e.into())),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsv_row() {
        assert_eq!(&["上海", "10", "ns"], parse_tsv_row("上海\t10\tns").as_slice());
    }

    #[test]
    fn test_parse_tsv_row_with_quote() {
        assert_eq!(
            &["\"引号\"", "3", "n"],
            parse_tsv_row("\"引号\"\t3\tn").as_slice()
        );
    }

    #[test]
    fn test_parse_tsv_row_with_empty_field() {
        assert_eq!(&["海", "", "n"], parse_tsv_row("海\t\tn").as_slice());
    }

    #[test]
    fn test_read_lines() {
        let data = "\u{feff}上海\t10\tns\r\n\n  \n海\t5\tn";
        let lines: Vec<_> = read_lines(data.as_bytes()).map(|l| l.unwrap()).collect();
        assert_eq!(
            lines,
            vec![(1, "上海\t10\tns".to_string()), (4, "海\t5\tn".to_string())]
        );
    }
}
