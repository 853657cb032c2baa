// XML temperature document parsing
//
// Expected shape:
//
//   <teploty>
//     <teplota>
//       <datum>2023-09-14</datum>
//       <cas>12:00:00</cas>
//       <hodnota>21.5</hodnota>
//     </teplota>
//     ...
//   </teploty>
use std::path::Path;

use roxmltree::{Document, Node};
use thermograph_shared::TemperatureReading;
use tracing::debug;

use crate::errors::IngestError;

const ROOT_ELEMENT: &str = "teploty";
const READING_ELEMENT: &str = "teplota";
const DATE_ELEMENT: &str = "datum";
const TIME_ELEMENT: &str = "cas";
const VALUE_ELEMENT: &str = "hodnota";

/// Read and parse a temperature document from disk.
pub fn read_document(path: impl AsRef<Path>) -> Result<Vec<TemperatureReading>, IngestError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_document(&text)
}

/// Parse a temperature document into its readings, in document order.
///
/// Only the first `<hodnota>` of a reading is used; the format carries a
/// list holding a single value.
pub fn parse_document(xml: &str) -> Result<Vec<TemperatureReading>, IngestError> {
    let document = Document::parse(xml).map_err(|e| IngestError::malformed(e.to_string()))?;
    let root = document.root_element();

    if !root.has_tag_name(ROOT_ELEMENT) {
        return Err(IngestError::malformed(format!(
            "expected root element <{}>, found <{}>",
            ROOT_ELEMENT,
            root.tag_name().name()
        )));
    }

    let readings = root
        .children()
        .filter(|node| node.has_tag_name(READING_ELEMENT))
        .enumerate()
        .map(|(index, node)| parse_reading(index, node))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = readings.len(), "Parsed temperature document");
    Ok(readings)
}

fn parse_reading(index: usize, node: Node) -> Result<TemperatureReading, IngestError> {
    Ok(TemperatureReading {
        date: child_text(index, node, DATE_ELEMENT)?,
        time: child_text(index, node, TIME_ELEMENT)?,
        value: child_text(index, node, VALUE_ELEMENT)?,
    })
}

fn child_text(index: usize, node: Node, element: &'static str) -> Result<String, IngestError> {
    node.children()
        .find(|child| child.has_tag_name(element))
        .map(|child| child.text().unwrap_or_default().trim().to_string())
        .ok_or(IngestError::MissingElement { index, element })
}
