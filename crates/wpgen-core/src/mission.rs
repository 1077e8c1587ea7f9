//! INAV mission document export.
//!
//! Builds the `<mission>` tree consumed by INAV Configurator / mwp and writes it
//! as tab-indented UTF-8 XML.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::Serialize;

use crate::error::MissionError;
use crate::models::Waypoint;

pub const MISSION_VERSION: &str = "2.3-pre8";
/// Flag value marking the final mission item.
pub const LAST_ITEM_FLAG: u8 = 165;
pub const MAP_ZOOM: u8 = 13;
pub const MISSION_CAPTION: &str = "✈️ INAV 7.0.1 mission file ready!";

/// Mission file name for a user's latest calculation.
pub fn mission_file_name(user_id: i64) -> String {
    format!("INAV_{user_id}.mission")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionAction {
    Waypoint,
}

impl MissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waypoint => "WAYPOINT",
        }
    }
}

/// Map view descriptor (`<mwp>`); centered on the first waypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapCenter {
    pub cx: f64,
    pub cy: f64,
    pub home_x: i32,
    pub home_y: i32,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionItem {
    /// 1-based sequence number.
    pub no: usize,
    pub action: MissionAction,
    pub lat: f64,
    pub lon: f64,
    pub alt: u32,
    pub parameter1: i32,
    pub parameter2: i32,
    pub parameter3: i32,
    pub flag: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionDocument {
    pub version: String,
    pub map_center: MapCenter,
    pub geozone_count: u32,
    pub items: Vec<MissionItem>,
}

impl MissionDocument {
    /// Map a waypoint sequence onto mission items, one per waypoint.
    pub fn build(waypoints: &[Waypoint]) -> Self {
        let (cx, cy) = waypoints
            .first()
            .map(|wp| (wp.lon, wp.lat))
            .unwrap_or((0.0, 0.0));
        let count = waypoints.len();

        let items = waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| {
                let no = i + 1;
                MissionItem {
                    no,
                    action: MissionAction::Waypoint,
                    lat: wp.lat,
                    lon: wp.lon,
                    alt: wp.altitude_m,
                    parameter1: 0,
                    parameter2: 0,
                    parameter3: 0,
                    flag: if no == count { LAST_ITEM_FLAG } else { 0 },
                }
            })
            .collect();

        Self {
            version: MISSION_VERSION.to_string(),
            map_center: MapCenter {
                cx,
                cy,
                home_x: 0,
                home_y: 0,
                zoom: MAP_ZOOM,
            },
            geozone_count: 0,
            items,
        }
    }

    /// Serialize with a standalone XML declaration and tab indentation.
    pub fn to_xml(&self) -> Result<String, MissionError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        writer.write_event(Event::Start(BytesStart::new("mission")))?;

        let mut version = BytesStart::new("version");
        version.push_attribute(("value", self.version.as_str()));
        writer.write_event(Event::Empty(version))?;

        // cx/cy keep full precision; the items below are rounded.
        let center = &self.map_center;
        let mut mwp = BytesStart::new("mwp");
        mwp.push_attribute(("cx", plain_decimal(center.cx).as_str()));
        mwp.push_attribute(("cy", plain_decimal(center.cy).as_str()));
        mwp.push_attribute(("home-x", center.home_x.to_string().as_str()));
        mwp.push_attribute(("home-y", center.home_y.to_string().as_str()));
        mwp.push_attribute(("zoom", center.zoom.to_string().as_str()));
        writer.write_event(Event::Empty(mwp))?;

        let mut geozones = BytesStart::new("geozones");
        geozones.push_attribute(("count", self.geozone_count.to_string().as_str()));
        writer.write_event(Event::Empty(geozones))?;

        for item in &self.items {
            writer.write_event(Event::Empty(item.to_element()))?;
        }

        writer.write_event(Event::End(BytesEnd::new("mission")))?;

        let xml = String::from_utf8(writer.into_inner())?;
        Ok(format!("{}\n", xml.trim()))
    }
}

/// Shortest round-trip decimal without exponent notation, always with a
/// fractional part (`69.0`, `-0.00005`).
fn plain_decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

impl MissionItem {
    fn to_element(&self) -> BytesStart<'static> {
        let mut element = BytesStart::new("missionitem");
        element.push_attribute(("no", self.no.to_string().as_str()));
        element.push_attribute(("action", self.action.as_str()));
        element.push_attribute(("lat", format!("{:.7}", self.lat).as_str()));
        element.push_attribute(("lon", format!("{:.7}", self.lon).as_str()));
        element.push_attribute(("alt", self.alt.to_string().as_str()));
        element.push_attribute(("parameter1", self.parameter1.to_string().as_str()));
        element.push_attribute(("parameter2", self.parameter2.to_string().as_str()));
        element.push_attribute(("parameter3", self.parameter3.to_string().as_str()));
        element.push_attribute(("flag", self.flag.to_string().as_str()));
        element
    }
}
