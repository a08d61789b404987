//! JSON-friendly views of TSR chains.

use serde::Serialize;

use herb_core::pose::PoseConfig;
use herb_tsr::{Chain, ChainFlags, Region};

#[derive(Debug, Serialize)]
pub struct RelativeFrameReport {
    pub body: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub manipulator: usize,
    pub reference: PoseConfig,
    pub offset: PoseConfig,
    /// `[min, max]` per axis in x, y, z, roll, pitch, yaw order.
    pub bounds: [[f64; 2]; 6],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_to: Option<RelativeFrameReport>,
}

impl From<&Region> for RegionReport {
    fn from(region: &Region) -> Self {
        Self {
            manipulator: region.manipulator().0,
            reference: PoseConfig::from_pose(region.reference()),
            offset: PoseConfig::from_pose(region.offset()),
            bounds: *region.bounds().rows(),
            relative_to: region.relative_frame().map(|frame| RelativeFrameReport {
                body: frame.body.clone(),
                link: frame.link.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChainReport {
    pub flags: ChainFlags,
    pub regions: Vec<RegionReport>,
}

impl From<&Chain> for ChainReport {
    fn from(chain: &Chain) -> Self {
        Self {
            flags: chain.flags(),
            regions: chain.regions().iter().map(RegionReport::from).collect(),
        }
    }
}

/// Report for every chain, in factory output order.
pub fn chains_report(chains: &[Chain]) -> Vec<ChainReport> {
    chains.iter().map(ChainReport::from).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
