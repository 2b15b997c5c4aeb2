//! Workbook embedded next to a chart so the chart's data stays editable.
//!
//! The workbook has a single sheet laid out as:
//!
//! ```text
//!     |    A     |    B     |    C     |
//! ----+----------+----------+----------+
//!   1 |          | Series 1 | Series 2 |
//!   2 | Cat 1    |   10.0   |   15.0   |
//!   3 | Cat 2    |   20.0   |   25.0   |
//! ```
//!
//! Column A holds the categories of the longest series and every series'
//! category range points into it. The chart part refers to these cells
//! through the formulas built by [`title_ref`], [`category_ref`] and
//! [`values_ref`].

use std::fmt::Write as FmtWrite;

use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::{Package, PackURI, PackageWriter};
use crate::presentation::chart::Series;

const SHEET_NAME: &str = "Sheet1";

/// Build the `.xlsx` bytes for a chart's series.
pub fn generate_chart_workbook(series: &[Series]) -> Result<Vec<u8>> {
    let mut pkg = Package::new();
    let workbook = PackURI::new("/xl/workbook.xml")?;
    let sheet = PackURI::new("/xl/worksheets/sheet1.xml")?;
    let styles = PackURI::new("/xl/styles.xml")?;

    pkg.rels_mut()
        .register(&PackURI::package(), rt::OFFICE_DOCUMENT, &workbook);
    let sheet_rid = pkg.rels_mut().register(&workbook, rt::WORKSHEET, &sheet);
    pkg.rels_mut().register(&workbook, rt::STYLES, &styles);

    pkg.add_part(
        workbook,
        ct::SML_SHEET_MAIN,
        workbook_xml(&sheet_rid).into_bytes(),
    );
    pkg.add_part(sheet, ct::SML_WORKSHEET, worksheet_xml(series)?.into_bytes());
    pkg.add_part(styles, ct::SML_STYLES, STYLES_XML.as_bytes().to_vec());

    PackageWriter::to_bytes(&pkg)
}

/// Excel column letters for a 0-based index: 0 is `A`, 26 is `AA`.
pub(crate) fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Category labels of column A: those of the longest series, the first
/// one on ties.
pub(crate) fn shared_categories(series: &[Series]) -> Vec<&str> {
    series
        .iter()
        .rev()
        .max_by_key(|s| s.len())
        .map(|s| s.categories().collect())
        .unwrap_or_default()
}

/// Cell holding the title of series `index`.
pub(crate) fn title_ref(index: usize) -> String {
    format!("{SHEET_NAME}!${}$1", column_letter(index + 1))
}

/// Range of the category labels.
pub(crate) fn category_ref(count: usize) -> String {
    format!("{SHEET_NAME}!$A$2:$A${}", count + 1)
}

/// Range of the values of series `index`.
pub(crate) fn values_ref(index: usize, count: usize) -> String {
    let col = column_letter(index + 1);
    format!("{SHEET_NAME}!${col}$2:${col}${}", count + 1)
}

fn workbook_xml(sheet_rid: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{SHEET_NAME}" sheetId="1" r:id="{sheet_rid}"/></sheets></workbook>"#,
        namespace::SML_MAIN,
        namespace::OFC_RELATIONSHIPS,
    )
}

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#;

pub(crate) fn worksheet_xml(series: &[Series]) -> Result<String> {
    let mut xml = String::with_capacity(1024 + series.len() * 256);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(xml, r#"<worksheet xmlns="{}"><sheetData>"#, namespace::SML_MAIN)?;

    xml.push_str(r#"<row r="1">"#);
    for (col, s) in series.iter().enumerate() {
        write!(
            xml,
            r#"<c r="{}1" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_letter(col + 1),
            escape_xml(&s.title)
        )?;
    }
    xml.push_str("</row>");

    let rows = series.iter().map(Series::len).max().unwrap_or(0);
    let categories = shared_categories(series);

    for row in 0..rows {
        let row_num = row + 2;
        write!(xml, r#"<row r="{row_num}">"#)?;
        if let Some(category) = categories.get(row) {
            match category.parse::<f64>() {
                Ok(number) => write!(xml, r#"<c r="A{row_num}"><v>{number}</v></c>"#)?,
                Err(_) => write!(
                    xml,
                    r#"<c r="A{row_num}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape_xml(category)
                )?,
            }
        }
        for (col, s) in series.iter().enumerate() {
            if let Some((_, value)) = s.values.get(row) {
                write!(
                    xml,
                    r#"<c r="{}{row_num}"><v>{value}</v></c>"#,
                    column_letter(col + 1)
                )?;
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::PackageReader;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(1), "B");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_formulas() {
        assert_eq!(title_ref(0), "Sheet1!$B$1");
        assert_eq!(category_ref(3), "Sheet1!$A$2:$A$4");
        assert_eq!(values_ref(1, 3), "Sheet1!$C$2:$C$4");
    }

    #[test]
    fn test_worksheet_layout() {
        let series = vec![
            Series::new("Sales", [("Q1", 10.0), ("Q2", 20.5)]),
            Series::new("Costs", [("Q1", 4.0), ("Q2", 6.0)]),
        ];
        let xml = worksheet_xml(&series).unwrap();
        assert!(xml.contains(r#"<c r="B1" t="inlineStr"><is><t>Sales</t></is></c>"#));
        assert!(xml.contains(r#"<c r="A3" t="inlineStr"><is><t>Q2</t></is></c>"#));
        assert!(xml.contains(r#"<c r="B3"><v>20.5</v></c>"#));
        assert!(xml.contains(r#"<c r="C2"><v>4</v></c>"#));
    }

    #[test]
    fn test_shared_categories_follow_the_longest_series() {
        let series = vec![
            Series::new("A", [("x", 1.0)]),
            Series::new("B", [("p", 1.0), ("q", 2.0)]),
            Series::new("C", [("m", 1.0), ("n", 2.0)]),
        ];
        assert_eq!(shared_categories(&series), ["p", "q"]);
        assert!(shared_categories(&[]).is_empty());
    }

    #[test]
    fn test_workbook_is_a_readable_package() {
        let bytes =
            generate_chart_workbook(&[Series::new("S", [("a", 1.0)])]).unwrap();
        let reader = PackageReader::new(&bytes).unwrap();
        assert_eq!(
            reader.main_document_part().unwrap().content_type,
            ct::SML_SHEET_MAIN
        );
        assert_eq!(reader.iter_parts().count(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_workbook_is_valid_package(
                rows in prop::collection::vec(("[a-zA-Z ]{1,12}", -1.0e6f64..1.0e6), 0..12),
                series_count in 1usize..5,
            ) {
                let series: Vec<Series> = (0..series_count)
                    .map(|i| Series::new(format!("Series {i}"), rows.clone()))
                    .collect();
                let bytes = generate_chart_workbook(&series).unwrap();
                prop_assert!(PackageReader::new(&bytes).is_ok());
            }
        }
    }
}
