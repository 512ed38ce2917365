//! ODM XML output generation.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use tracing::info;

use odm_model::ClinicalDocument;

/// ODM namespace.
pub const ODM_NS: &str = "http://www.cdisc.org/ns/odm/v1.3";

/// XML digital signature namespace.
pub const DS_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// REDCap vendor extension namespace.
pub const REDCAP_NS: &str = "https://projectredcap.org";

/// Schema location hint carried on the root element.
pub const SCHEMA_LOCATION: &str = "http://www.cdisc.org/ns/odm/v1.3 ODM1-3-1.xsd";

/// ODM version attribute value.
pub const ODM_VERSION: &str = "1.3.1";

/// Write the document as ODM XML.
///
/// The file is written to a `.tmp` sibling first and renamed into place,
/// so a failure mid-write never leaves a truncated document at the
/// target path.
pub fn write_odm_xml(output_path: &Path, document: &ClinicalDocument) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let tmp_path = tmp_sibling(output_path)?;

    let file =
        File::create(&tmp_path).with_context(|| format!("create {}", tmp_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_odm_events(&mut writer, document)?;
    writer
        .flush()
        .with_context(|| format!("flush {}", tmp_path.display()))?;
    drop(writer);

    fs::rename(&tmp_path, output_path).with_context(|| {
        format!(
            "rename {} to {}",
            tmp_path.display(),
            output_path.display()
        )
    })?;
    info!(path = %output_path.display(), subjects = document.subjects.len(), "wrote ODM XML");
    Ok(())
}

fn write_odm_events<W: Write>(writer: W, document: &ClinicalDocument) -> Result<()> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let file_oid = format!("{}.Export", document.study_oid);
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("ODM");
    root.push_attribute(("xmlns", ODM_NS));
    root.push_attribute(("xmlns:ds", DS_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xmlns:redcap", REDCAP_NS));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    root.push_attribute(("ODMVersion", ODM_VERSION));
    root.push_attribute(("FileType", "Snapshot"));
    root.push_attribute(("FileOID", file_oid.as_str()));
    root.push_attribute(("CreationDateTime", timestamp.as_str()));
    root.push_attribute(("AsOfDateTime", timestamp.as_str()));
    root.push_attribute(("SourceSystem", "REDCap"));
    xml.write_event(Event::Start(root))?;

    let mut clinical = BytesStart::new("ClinicalData");
    clinical.push_attribute(("StudyOID", document.study_oid.as_str()));
    clinical.push_attribute(("MetaDataVersionOID", "Metadata.Project"));
    xml.write_event(Event::Start(clinical))?;

    for subject in &document.subjects {
        let mut subject_el = BytesStart::new("SubjectData");
        subject_el.push_attribute(("SubjectKey", subject.subject_key.as_str()));
        xml.write_event(Event::Start(subject_el))?;

        for event in &subject.events {
            let event_oid = format!("Event.{}", event.event);
            let repeat_key = event.repeat_key.to_string();
            let mut event_el = BytesStart::new("StudyEventData");
            event_el.push_attribute(("StudyEventOID", event_oid.as_str()));
            event_el.push_attribute(("StudyEventRepeatKey", repeat_key.as_str()));
            event_el.push_attribute(("redcap:UniqueEventName", event.event.as_str()));
            xml.write_event(Event::Start(event_el))?;

            for form in &event.forms {
                let form_oid = format!("Form.{}", form.form);
                let repeat_key = form.repeat_key.to_string();
                let mut form_el = BytesStart::new("FormData");
                form_el.push_attribute(("FormOID", form_oid.as_str()));
                form_el.push_attribute(("FormRepeatKey", repeat_key.as_str()));
                xml.write_event(Event::Start(form_el))?;

                for group in &form.groups {
                    let repeat_key = group.repeat_key.to_string();
                    let mut group_el = BytesStart::new("ItemGroupData");
                    group_el.push_attribute(("ItemGroupOID", group.oid.as_str()));
                    group_el.push_attribute(("ItemGroupRepeatKey", repeat_key.as_str()));
                    xml.write_event(Event::Start(group_el))?;

                    for item in &group.items {
                        let item_oid = format!("Item.{}", item.oid);
                        let mut item_el = BytesStart::new("ItemData");
                        item_el.push_attribute(("ItemOID", item_oid.as_str()));
                        item_el.push_attribute(("Value", item.value.as_str()));
                        xml.write_event(Event::Empty(item_el))?;
                    }

                    xml.write_event(Event::End(BytesEnd::new("ItemGroupData")))?;
                }

                xml.write_event(Event::End(BytesEnd::new("FormData")))?;
            }

            xml.write_event(Event::End(BytesEnd::new("StudyEventData")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("SubjectData")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("ClinicalData")))?;
    xml.write_event(Event::End(BytesEnd::new("ODM")))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn tmp_sibling(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("output path {} has no file name", path.display()))?;
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
