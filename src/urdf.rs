//! Supports reading the kinematic robot model from URDF (optional)

extern crate sxd_document;

use std::fs::read_to_string;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use sxd_document::{dom, parser, QName};
use tracing::{debug, warn};

use crate::conversion_error::ConversionError;
use crate::joint_model::{JointModel, JointType, RobotModel, VariableBounds};
use crate::utils::replace_stl_with_obj;

/// Reads the robot model from a URDF file. XACRO files may also work as long as joint
/// limits are plain numbers or `${radians(x)}` expressions. The model has no joint
/// groups yet; add them from SRDF or with [`RobotModel::add_group`].
///
/// # Example
/// ```
/// let model = drake_joint_conversions::urdf::from_urdf_file("src/tests/data/two_arm.urdf")
///     .expect("Failed to read URDF");
/// println!("{} has {} joints", model.name(), model.joint_models().len());
/// ```
pub fn from_urdf_file<P: AsRef<Path>>(path: P) -> Result<RobotModel> {
    let path = path.as_ref();
    let xml_content = read_to_string(path)
        .with_context(|| format!("Failed to read urdf file {}", path.display()))?;
    from_urdf(&xml_content)
        .with_context(|| format!("Failed to interpret robot model in {}", path.display()))
}

/// Parses URDF XML content into a robot model.
///
/// Every `<joint>` element becomes a joint in the order of declaration. Revolute and
/// prismatic joints with a `<limit lower upper>` are position bounded. A positive
/// `velocity` attribute of the limit gives a symmetric velocity bound. Acceleration
/// and jerk are not part of URDF, see `joint_limits` for those.
pub fn from_urdf(xml_content: &str) -> Result<RobotModel, ConversionError> {
    let package = parser::parse(xml_content)
        .map_err(|e| ConversionError::XmlProcessingError(format!("Failed to parse XML: {}", e)))?;
    let document = package.as_document();

    let root_element = document.root().children().into_iter()
        .find_map(|e| e.element())
        .ok_or_else(|| ConversionError::XmlProcessingError("No root element found".to_string()))?;

    let robot_name = root_element.attribute("name")
        .map(|attr| attr.value().to_string())
        .unwrap_or_else(|| "Unnamed".to_string());

    let mut model = RobotModel::new(robot_name);
    collect_joints(root_element, &mut model)?;
    debug!("URDF robot {} with {} joints", model.name(), model.joint_models().len());
    Ok(model)
}

/// Rewrites every mesh `filename` attribute so that STL references point to OBJ files.
pub fn rewrite_mesh_references(xml_content: &str) -> Result<String, ConversionError> {
    let re = Regex::new(r#"filename\s*=\s*"([^"]*)""#)
        .map_err(|_| ConversionError::ParseError("Invalid regex pattern".to_string()))?;
    Ok(re.replace_all(xml_content, |caps: &Captures| {
        format!("filename=\"{}\"", replace_stl_with_obj(&caps[1]))
    }).into_owned())
}

// Recursive function to collect joint data
fn collect_joints(element: dom::Element, model: &mut RobotModel) -> Result<(), ConversionError> {
    let joint_tag = QName::new("joint");
    let limit_tag = QName::new("limit");

    for child in element.children().into_iter().filter_map(|e| e.element()) {
        if child.name() == joint_tag {
            let name = child.attribute("name")
                .map(|attr| attr.value().to_string())
                .ok_or_else(|| ConversionError::MissingField("joint name".to_string()))?;
            let type_name = child.attribute("type")
                .map(|attr| attr.value().to_string())
                .unwrap_or_else(|| "fixed".to_string());

            let Some(joint_type) = JointType::from_urdf(&type_name) else {
                warn!("Joint {} of type {} is not a single-DOF joint, ignored", name, type_name);
                continue;
            };

            let limit_element = child.children().into_iter()
                .find_map(|e| e.element().filter(|el| el.name() == limit_tag));

            let mut bounds = VariableBounds::default();
            if let Some(limit) = limit_element {
                match read_limits(limit, joint_type) {
                    Ok(read) => bounds = read,
                    Err(e) => warn!("Joint limits defined but not readable for {}: {}", name, e),
                }
            }
            model.add_joint(JointModel::new(name, joint_type, bounds));
        }

        collect_joints(child, model)?;
    }

    Ok(())
}

fn read_limits(element: dom::Element, joint_type: JointType) -> Result<VariableBounds, ConversionError> {
    let mut bounds = VariableBounds::default();

    if matches!(joint_type, JointType::Revolute | JointType::Prismatic) {
        let lower = element.attribute("lower").map(|a| parse_angle(a.value())).transpose()?;
        let upper = element.attribute("upper").map(|a| parse_angle(a.value())).transpose()?;
        // URDF defaults a missing lower/upper to zero
        let (lower, upper) = (lower.unwrap_or(0.0), upper.unwrap_or(0.0));
        if lower < upper {
            bounds = bounds.with_position(lower, upper);
        }
    }

    if let Some(velocity) = element.attribute("velocity") {
        let velocity: f64 = velocity.value().trim().parse()
            .map_err(|_| ConversionError::ParseError(format!("velocity limit {}", velocity.value())))?;
        if velocity > 0.0 {
            bounds = bounds.with_velocity(-velocity, velocity);
        }
    }
    Ok(bounds)
}

fn parse_angle(attr_value: &str) -> Result<f64, ConversionError> {
    // Regular expression to match the ${radians(<number>)} format that is common in xacro
    let re = Regex::new(r"^\$\{radians\((-?\d+(\.\d+)?)\)\}$")
        .map_err(|_| ConversionError::ParseError("Invalid regex pattern".to_string()))?;

    let attr_value = attr_value.trim();
    if let Some(caps) = re.captures(attr_value) {
        let degrees: f64 = caps[1].parse()
            .map_err(|_| ConversionError::ParseError(format!("Bad angle: {}", attr_value)))?;
        Ok(degrees.to_radians())
    } else {
        // Plain number, radians or meters
        attr_value.parse()
            .map_err(|_| ConversionError::ParseError(format!("Bad angle: {}", attr_value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joints_and_limits() {
        let xml = r#"
            <robot name="bench">
                <link name="base"/>
                <joint name="mount" type="fixed">
                    <origin xyz="0 0 0.1"/>
                </joint>
                <joint name="shoulder" type="revolute">
                    <axis xyz="0 0 1"/>
                    <limit lower="-3.14" upper="${radians(90)}" effort="0" velocity="2.5"/>
                </joint>
                <joint name="spin" type="continuous">
                    <limit effort="0" velocity="6.0"/>
                </joint>
                <joint name="rail" type="prismatic">
                    <limit lower="0.0" upper="1.2" effort="0" velocity="0"/>
                </joint>
            </robot>
        "#;

        let model = from_urdf(xml).expect("Failed to process XML joints");
        assert_eq!(model.name(), "bench");
        assert_eq!(model.joint_models().len(), 4);
        assert_eq!(model.active_joint_models().count(), 3);

        let shoulder = model.joint_model("shoulder").unwrap().variable_bounds()[0];
        assert!(shoulder.position_bounded);
        assert_eq!(shoulder.min_position, -3.14);
        assert!((shoulder.max_position - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(shoulder.velocity_bounded);
        assert_eq!((shoulder.min_velocity, shoulder.max_velocity), (-2.5, 2.5));
        assert!(!shoulder.acceleration_bounded);

        let spin = model.joint_model("spin").unwrap().variable_bounds()[0];
        assert!(!spin.position_bounded, "Continuous joint has no position limits");
        assert_eq!(spin.max_velocity, 6.0);

        let rail = model.joint_model("rail").unwrap().variable_bounds()[0];
        assert_eq!((rail.min_position, rail.max_position), (0.0, 1.2));
        assert!(!rail.velocity_bounded, "Zero velocity limit means no limit");
    }

    #[test]
    fn test_nested_and_unsupported_joints() {
        let xml = r#"
            <robot name="nested">
                <joint name="float" type="floating"/>
                <macro name="arm">
                    <joint name="inner" type="revolute">
                        <limit lower="-1" upper="1" velocity="1"/>
                    </joint>
                </macro>
            </robot>
        "#;
        let model = from_urdf(xml).unwrap();
        assert!(model.joint_model("float").is_err());
        assert!(model.joint_model("inner").is_ok());
    }

    #[test]
    fn test_unreadable_limits_are_ignored() {
        let xml = r#"<robot><joint name="j" type="revolute"><limit lower="abc" upper="1"/></joint></robot>"#;
        let model = from_urdf(xml).unwrap();
        assert!(!model.joint_model("j").unwrap().variable_bounds()[0].position_bounded);
    }

    #[test]
    fn test_missing_joint_name() {
        let xml = r#"<robot><joint type="revolute"/></robot>"#;
        assert!(matches!(from_urdf(xml), Err(ConversionError::MissingField(_))));
    }

    #[test]
    fn test_not_xml() {
        assert!(matches!(from_urdf("<robot"), Err(ConversionError::XmlProcessingError(_))));
    }

    #[test]
    fn test_rewrite_mesh_references() {
        let xml = r#"<mesh filename="package://r/meshes/link1.STL"/><mesh filename="link2.stl" scale="1 1 1"/><name>x.stl</name>"#;
        let rewritten = rewrite_mesh_references(xml).unwrap();
        assert_eq!(
            rewritten,
            r#"<mesh filename="package://r/meshes/link1.obj"/><mesh filename="link2.obj" scale="1 1 1"/><name>x.stl</name>"#
        );
    }

    #[test]
    fn test_parse_angle() {
        assert_eq!(parse_angle("1.5").unwrap(), 1.5);
        assert!((parse_angle("${radians(-180)}").unwrap() + std::f64::consts::PI).abs() < 1e-12);
        assert!(parse_angle("${pi}").is_err());
    }
}
