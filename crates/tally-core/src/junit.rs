//! Parser for surefire `TEST-*.xml` result documents.
//!
//! One document holds one `<testsuite>` with optional `<properties>` and
//! any number of `<testcase>` children. Extraction is best-effort: absent
//! attributes default (empty string / 0) and unknown elements such as
//! `<system-out>` are skipped. A document whose root is missing or whose
//! markup or numeric attributes do not parse fails with
//! [`ReportError::Format`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ReportError;

/// One parsed test suite document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestSuite {
    pub name: String,
    pub time: f64,
    pub tests: u64,
    pub errors: u64,
    pub skipped: u64,
    pub failures: u64,
    /// `<property>` name/value pairs; a repeated name keeps the last
    /// occurrence, a missing value is preserved as null.
    pub properties: BTreeMap<String, Option<String>>,
    pub testcases: Vec<TestCase>,
}

/// One `<testcase>`, with at most one outcome marker of each kind.
///
/// A well-formed document carries a single marker; if a malformed one
/// carries several kinds, all present ones are attached as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub classname: String,
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<OutcomeDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<OutcomeDetail>,
}

/// Detail carried by a `<failure>`, `<error>` or `<skipped>` marker.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutcomeDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Parse one test-result document.
pub fn parse_test_suite(xml: &str) -> Result<TestSuite, ReportError> {
    let mut reader = Reader::from_str(xml);

    let mut suite = loop {
        match read_event(&mut reader)? {
            Event::Start(e) => {
                require_testsuite(&e)?;
                break suite_from_attrs(&e)?;
            }
            Event::Empty(e) => {
                require_testsuite(&e)?;
                return suite_from_attrs(&e);
            }
            Event::Eof => return Err(ReportError::format("no testsuite element found")),
            // Prolog: declaration, doctype, comments, whitespace.
            _ => continue,
        }
    };

    loop {
        match read_event(&mut reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"properties" => read_properties(&mut reader, &mut suite.properties)?,
                b"testcase" => {
                    let case = read_test_case(&mut reader, &e)?;
                    suite.testcases.push(case);
                }
                _ => skip_subtree(&mut reader, &e)?,
            },
            Event::Empty(e) if e.name().as_ref() == b"testcase" => {
                suite.testcases.push(case_from_attrs(&e)?);
            }
            Event::End(_) => break,
            Event::Eof => return Err(ReportError::format("unexpected end of document")),
            _ => {}
        }
    }

    Ok(suite)
}

fn require_testsuite(e: &BytesStart<'_>) -> Result<(), ReportError> {
    if e.name().as_ref() == b"testsuite" {
        Ok(())
    } else {
        Err(ReportError::format("no testsuite element found"))
    }
}

fn suite_from_attrs(e: &BytesStart<'_>) -> Result<TestSuite, ReportError> {
    Ok(TestSuite {
        name: attr_value(e, b"name")?.unwrap_or_default(),
        time: f64_attr(e, b"time")?,
        tests: u64_attr(e, b"tests")?,
        errors: u64_attr(e, b"errors")?,
        skipped: u64_attr(e, b"skipped")?,
        failures: u64_attr(e, b"failures")?,
        properties: BTreeMap::new(),
        testcases: Vec::new(),
    })
}

fn case_from_attrs(e: &BytesStart<'_>) -> Result<TestCase, ReportError> {
    Ok(TestCase {
        name: attr_value(e, b"name")?.unwrap_or_default(),
        classname: attr_value(e, b"classname")?.unwrap_or_default(),
        time: f64_attr(e, b"time")?,
        failure: None,
        error: None,
        skipped: None,
    })
}

fn read_properties(
    reader: &mut Reader<&[u8]>,
    properties: &mut BTreeMap<String, Option<String>>,
) -> Result<(), ReportError> {
    loop {
        match read_event(reader)? {
            Event::Empty(e) if e.name().as_ref() == b"property" => {
                insert_property(&e, properties)?;
            }
            Event::Start(e) => {
                if e.name().as_ref() == b"property" {
                    insert_property(&e, properties)?;
                }
                skip_subtree(reader, &e)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(ReportError::format("unexpected end of document")),
            _ => {}
        }
    }
}

fn insert_property(
    e: &BytesStart<'_>,
    properties: &mut BTreeMap<String, Option<String>>,
) -> Result<(), ReportError> {
    // Entries without a name attribute are ignored.
    if let Some(name) = attr_value(e, b"name")? {
        properties.insert(name, attr_value(e, b"value")?);
    }
    Ok(())
}

fn read_test_case(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<TestCase, ReportError> {
    let mut case = case_from_attrs(start)?;
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.name().as_ref() {
                b"failure" if case.failure.is_none() => {
                    case.failure = Some(read_outcome(reader, &e)?);
                }
                b"error" if case.error.is_none() => {
                    case.error = Some(read_outcome(reader, &e)?);
                }
                b"skipped" if case.skipped.is_none() => {
                    case.skipped = Some(read_outcome(reader, &e)?);
                }
                _ => skip_subtree(reader, &e)?,
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"failure" if case.failure.is_none() => {
                    case.failure = Some(outcome_from_attrs(&e)?);
                }
                b"error" if case.error.is_none() => {
                    case.error = Some(outcome_from_attrs(&e)?);
                }
                b"skipped" if case.skipped.is_none() => {
                    case.skipped = Some(outcome_from_attrs(&e)?);
                }
                _ => {}
            },
            Event::End(_) => return Ok(case),
            Event::Eof => return Err(ReportError::format("unexpected end of document")),
            _ => {}
        }
    }
}

fn outcome_from_attrs(e: &BytesStart<'_>) -> Result<OutcomeDetail, ReportError> {
    Ok(OutcomeDetail {
        message: attr_value(e, b"message")?.unwrap_or_default(),
        kind: attr_value(e, b"type")?.unwrap_or_default(),
        text: String::new(),
    })
}

fn read_outcome(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<OutcomeDetail, ReportError> {
    let mut detail = outcome_from_attrs(start)?;
    // Inner text is the free text before the first child element.
    let mut seen_child = false;
    loop {
        match read_event(reader)? {
            Event::Text(t) if !seen_child => {
                let text = t
                    .unescape()
                    .map_err(|e| ReportError::format(format!("malformed document: {e}")))?;
                detail.text.push_str(&text);
            }
            Event::CData(t) if !seen_child => {
                detail.text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::Start(e) => {
                seen_child = true;
                skip_subtree(reader, &e)?;
            }
            Event::Empty(_) => seen_child = true,
            Event::End(_) => return Ok(detail),
            Event::Eof => return Err(ReportError::format("unexpected end of document")),
            _ => {}
        }
    }
}

fn skip_subtree(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<(), ReportError> {
    reader
        .read_to_end(start.name())
        .map_err(|e| ReportError::format(format!("malformed document: {e}")))?;
    Ok(())
}

fn read_event<'i>(reader: &mut Reader<&'i [u8]>) -> Result<Event<'i>, ReportError> {
    reader
        .read_event()
        .map_err(|e| ReportError::format(format!("malformed document: {e}")))
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, ReportError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ReportError::format(format!("malformed attribute: {e}")))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| ReportError::format(format!("malformed attribute: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn f64_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<f64, ReportError> {
    match attr_value(e, key)? {
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
            ReportError::format(format!(
                "invalid numeric attribute {}=\"{raw}\"",
                String::from_utf8_lossy(key)
            ))
        }),
        None => Ok(0.0),
    }
}

fn u64_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<u64, ReportError> {
    match attr_value(e, key)? {
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            ReportError::format(format!(
                "invalid numeric attribute {}=\"{raw}\"",
                String::from_utf8_lossy(key)
            ))
        }),
        None => Ok(0),
    }
}
