use crate::error::Result;
use roxmltree::Document;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One data row, keyed by the header-cell text of its worksheet.
pub type SheetRow = HashMap<String, String>;

/// A parsed export file: worksheet name to its data rows, in document
/// order. Worksheets that share a declared name are concatenated under it.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: HashMap<String, Vec<SheetRow>>,
}

impl Workbook {
    /// Reads and parses one spreadsheet-XML export file. The portal emits
    /// UTF-16 with stray NUL bytes; both are handled before XML parsing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading export file {}", path.as_ref().display());
        let bytes = fs::read(path)?;
        let xml = decode_export_bytes(&bytes);
        Self::parse(&xml)
    }

    /// Parses spreadsheet-XML text into sheets of header-keyed rows.
    ///
    /// Cells are matched to headers positionally: the k-th header names the
    /// k-th `Data` cell of every row. A row that ends early yields empty
    /// strings for the remaining headers.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;

        let mut sheets: HashMap<String, Vec<SheetRow>> = HashMap::new();

        for worksheet in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "Worksheet")
        {
            // ss:Name attribute; matched by local name so the spreadsheet
            // namespace prefix is irrelevant
            let Some(name) = worksheet
                .attributes()
                .find(|a| a.name() == "Name")
                .map(|a| a.value().to_string())
            else {
                warn!("Skipping worksheet without a Name attribute");
                continue;
            };

            let rows: Vec<_> = worksheet
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "Row")
                .collect();

            let Some((header_row, data_rows)) = rows.split_first() else {
                sheets.entry(name).or_default();
                continue;
            };

            let headers: Vec<String> = cell_texts(header_row);

            let parsed: Vec<SheetRow> = data_rows
                .iter()
                .map(|row| {
                    let cells = cell_texts(row);
                    headers
                        .iter()
                        .enumerate()
                        .map(|(k, header)| {
                            let value = cells.get(k).cloned().unwrap_or_default();
                            (header.clone(), value)
                        })
                        .collect()
                })
                .collect();

            debug!("Worksheet '{}': {} data rows", name, parsed.len());
            sheets.entry(name).or_default().extend(parsed);
        }

        Ok(Self { sheets })
    }

    /// Rows of the named sheet; empty when the export lacks it.
    pub fn sheet(&self, name: &str) -> &[SheetRow] {
        self.sheets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }
}

fn cell_texts(row: &roxmltree::Node) -> Vec<String> {
    row.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Data")
        .map(|n| n.text().unwrap_or("").to_string())
        .collect()
}

/// Decodes raw export bytes to XML text. Files arrive UTF-16 encoded (the
/// portal writes UCS-2); some copies have already been re-saved as UTF-8
/// with the interleaved NUL bytes left in. Embedded NULs and BOM characters
/// are stripped either way.
fn decode_export_bytes(bytes: &[u8]) -> String {
    let text = match bytes {
        [0xFF, 0xFE, rest @ ..] => utf16_to_string(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16_to_string(rest, u16::from_be_bytes),
        _ => {
            let cleaned: Vec<u8> = bytes.iter().copied().filter(|b| *b != 0).collect();
            String::from_utf8_lossy(&cleaned).into_owned()
        }
    };
    text.replace(['\0', '\u{feff}'], "")
}

fn utf16_to_string(bytes: &[u8], decode: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| decode([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<Workbook xmlns="urn:schemas-microsoft-com:office:spreadsheet"
          xmlns:ss="urn:schemas-microsoft-com:office:spreadsheet">
  <Worksheet ss:Name="Projects">
    <Table>
      <Row><Cell><Data>PROJECTID</Data></Cell><Cell><Data>PROJECT_NAME</Data></Cell></Row>
      <Row><Cell><Data>100</Data></Cell><Cell><Data>Harbour Tower</Data></Cell></Row>
      <Row><Cell><Data>101</Data></Cell></Row>
    </Table>
  </Worksheet>
  <Worksheet ss:Name="Projects">
    <Table>
      <Row><Cell><Data>PROJECTID</Data></Cell><Cell><Data>PROJECT_NAME</Data></Cell></Row>
      <Row><Cell><Data>102</Data></Cell><Cell><Data>Depot Annex</Data></Cell></Row>
    </Table>
  </Worksheet>
</Workbook>"#;

    #[test]
    fn maps_headers_to_cells_in_order() {
        let workbook = Workbook::parse(SAMPLE).unwrap();
        let rows = workbook.sheet("Projects");
        assert_eq!(rows[0]["PROJECTID"], "100");
        assert_eq!(rows[0]["PROJECT_NAME"], "Harbour Tower");
    }

    #[test]
    fn header_row_is_not_data() {
        let workbook = Workbook::parse(SAMPLE).unwrap();
        assert!(workbook
            .sheet("Projects")
            .iter()
            .all(|row| row["PROJECTID"] != "PROJECTID"));
    }

    #[test]
    fn duplicate_sheet_names_concatenate() {
        let workbook = Workbook::parse(SAMPLE).unwrap();
        let rows = workbook.sheet("Projects");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["PROJECTID"], "102");
    }

    #[test]
    fn short_rows_pad_with_empty_strings() {
        let workbook = Workbook::parse(SAMPLE).unwrap();
        let rows = workbook.sheet("Projects");
        assert_eq!(rows[1]["PROJECTID"], "101");
        assert_eq!(rows[1]["PROJECT_NAME"], "");
    }

    #[test]
    fn missing_sheet_is_empty() {
        let workbook = Workbook::parse(SAMPLE).unwrap();
        assert!(workbook.sheet("Firm Details").is_empty());
    }

    #[test]
    fn strips_embedded_nuls_before_parsing() {
        let with_nuls: String = SAMPLE.chars().flat_map(|c| [c, '\0']).collect();
        let xml = decode_export_bytes(with_nuls.as_bytes());
        let workbook = Workbook::parse(&xml).unwrap();
        assert_eq!(workbook.sheet("Projects").len(), 3);
    }

    #[test]
    fn decodes_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(SAMPLE.encode_utf16().flat_map(|u| u.to_le_bytes()));
        let xml = decode_export_bytes(&bytes);
        let workbook = Workbook::parse(&xml).unwrap();
        assert_eq!(workbook.sheet("Projects").len(), 3);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(Workbook::parse("<Workbook><Worksheet>").is_err());
    }
}
