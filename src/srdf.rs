//! Supports reading joint groups from SRDF (optional)

use std::fs::read_to_string;
use std::path::Path;

use anyhow::{Context, Result};
use sxd_document::{dom, parser, QName};
use tracing::{debug, warn};

use crate::conversion_error::ConversionError;
use crate::joint_model::RobotModel;

/// Adds the joint groups of an SRDF document to the model. Only groups listing their
/// joints with `<joint name="..."/>` are read; groups defined through chains, links or
/// subgroups are skipped with a warning. Returns the names of the groups added.
///
/// ```xml
/// <robot name="two_arm">
///   <group name="left_arm">
///     <joint name="left_shoulder"/>
///     <joint name="left_elbow"/>
///   </group>
/// </robot>
/// ```
pub fn add_groups_from_srdf(model: &mut RobotModel, xml_content: &str) -> Result<Vec<String>, ConversionError> {
    let package = parser::parse(xml_content)
        .map_err(|e| ConversionError::XmlProcessingError(format!("Failed to parse XML: {}", e)))?;
    let document = package.as_document();

    let root_element = document.root().children().into_iter()
        .find_map(|e| e.element())
        .ok_or_else(|| ConversionError::XmlProcessingError("No root element found".to_string()))?;

    let group_tag = QName::new("group");
    let mut added = Vec::new();
    for group in root_element.children().into_iter().filter_map(|e| e.element()) {
        if group.name() != group_tag {
            continue;
        }
        let name = group.attribute("name")
            .map(|attr| attr.value().to_string())
            .ok_or_else(|| ConversionError::MissingField("group name".to_string()))?;

        let joint_names = group_joint_names(group);
        if joint_names.is_empty() {
            warn!("Group {} lists no joints directly, ignored", name);
            continue;
        }
        model.add_group(&name, &joint_names)?;
        debug!("Group {} with joints {:?}", name, joint_names);
        added.push(name);
    }
    Ok(added)
}

pub fn add_groups_from_srdf_file<P: AsRef<Path>>(model: &mut RobotModel, path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let xml_content = read_to_string(path)
        .with_context(|| format!("Failed to read srdf file {}", path.display()))?;
    add_groups_from_srdf(model, &xml_content)
        .with_context(|| format!("Failed to read joint groups from {}", path.display()))
}

fn group_joint_names(group: dom::Element) -> Vec<String> {
    let joint_tag = QName::new("joint");
    group.children().into_iter()
        .filter_map(|e| e.element())
        .filter(|el| el.name() == joint_tag)
        .filter_map(|el| el.attribute("name").map(|attr| attr.value().to_string()))
        .collect()
}
