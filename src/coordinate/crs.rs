//! Coordinate Reference System handling

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{ZonalError, ZonalResult};

/// Identifier for the coordinate systems the engine can transform between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// WGS 84 geographic, longitude/latitude order (EPSG:4326)
    WGS84,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// UTM Zone on the WGS 84 ellipsoid (EPSG:326xx north, 327xx south)
    UTM(u8, bool),
    /// Other EPSG code, only usable for identity transforms
    Other(u32),
}

lazy_static! {
    /// Codes that name a system equivalent to one of the supported ones
    static ref EPSG_ALIASES: HashMap<u32, CoordinateSystem> = {
        let mut m = HashMap::new();
        // ETRS89 is within a metre of WGS 84 at continental scale
        m.insert(4258, CoordinateSystem::WGS84);
        m.insert(900913, CoordinateSystem::WebMercator);
        m.insert(102100, CoordinateSystem::WebMercator);
        m.insert(102113, CoordinateSystem::WebMercator);
        m
    };

    static ref CRS84_PATTERN: Regex =
        Regex::new(r"^(?:OGC:CRS84|CRS:84|URN:OGC:DEF:CRS:OGC:1\.3:CRS84|HTTPS?://WWW\.OPENGIS\.NET/DEF/CRS/OGC/1\.3/CRS84)$")
            .expect("static regex");

    static ref CODE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^(?:EPSG|ESRI):{1,2}(\d+)$").expect("static regex"),
        Regex::new(r"^(\d+)$").expect("static regex"),
        Regex::new(r"^URN:OGC:DEF:CRS:EPSG:[0-9.]*:(\d+)$").expect("static regex"),
        Regex::new(r"^HTTPS?://WWW\.OPENGIS\.NET/DEF/CRS/EPSG/[0-9.]+/(\d+)$").expect("static regex"),
    ];
}

impl CoordinateSystem {
    /// Get the EPSG code for this coordinate system
    pub fn epsg_code(&self) -> u32 {
        match self {
            CoordinateSystem::WGS84 => 4326,
            CoordinateSystem::WebMercator => 3857,
            CoordinateSystem::UTM(zone, is_northern) => {
                if *is_northern {
                    32600 + *zone as u32
                } else {
                    32700 + *zone as u32
                }
            },
            CoordinateSystem::Other(code) => *code,
        }
    }

    /// Whether coordinates are angular (degrees) rather than projected metres
    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::WGS84)
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::WGS84 => "WGS 84 (EPSG:4326)".to_string(),
            CoordinateSystem::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            CoordinateSystem::UTM(zone, is_northern) => {
                if *is_northern {
                    format!("UTM Zone {}N (EPSG:{})", zone, self.epsg_code())
                } else {
                    format!("UTM Zone {}S (EPSG:{})", zone, self.epsg_code())
                }
            },
            CoordinateSystem::Other(code) => format!("EPSG:{}", code),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg_code())
    }
}

/// Factory for creating coordinate systems
pub struct CoordinateSystemFactory;

impl CoordinateSystemFactory {
    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> CoordinateSystem {
        if let Some(system) = EPSG_ALIASES.get(&epsg) {
            return *system;
        }

        match epsg {
            4326 => CoordinateSystem::WGS84,
            3857 => CoordinateSystem::WebMercator,
            32601..=32660 => CoordinateSystem::UTM((epsg - 32600) as u8, true),
            32701..=32760 => CoordinateSystem::UTM((epsg - 32700) as u8, false),
            // ETRS89 / UTM zones share the WGS 84 formulas
            25801..=25860 => CoordinateSystem::UTM((epsg - 25800) as u8, true),
            _ => CoordinateSystem::Other(epsg),
        }
    }

    /// Parse a coordinate system identifier
    ///
    /// Accepts `EPSG:4326`, a bare `4326`, OGC URNs and URLs, and the CRS84
    /// aliases used by RFC 7946 documents.
    pub fn from_string(crs_str: &str) -> ZonalResult<CoordinateSystem> {
        let normalized = crs_str.trim().to_uppercase();

        if CRS84_PATTERN.is_match(&normalized) {
            return Ok(CoordinateSystem::WGS84);
        }

        for pattern in CODE_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&normalized) {
                let code = caps[1].parse::<u32>()
                    .map_err(|_| ZonalError::UnsupportedCrs(format!("Invalid EPSG code in '{}'", crs_str)))?;
                return Ok(Self::from_epsg(code));
            }
        }

        Err(ZonalError::UnsupportedCrs(format!("Unsupported CRS format: {}", crs_str)))
    }
}
