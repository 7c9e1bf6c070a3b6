//! Per-region mean/min/max reduction over one raster

use std::collections::HashMap;

use log::{debug, info};

use crate::coordinate::{Reprojector, OUTPUT_CRS};
use crate::errors::ZonalResult;
use crate::raster::Raster;
use crate::sampler::RasterSampler;
use crate::utils::progress::ProgressTracker;
use crate::vector::RegionCollection;

/// Statistics of the non-missing cells covered by one region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZonalStats {
    /// Number of contributing cells, always at least 1
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ZonalStats {
    /// Reduce values to statistics, `None` when there are none
    ///
    /// Infinite values are treated as missing, like NaN.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values.into_iter().filter(|v| v.is_finite()) {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        Some(ZonalStats {
            count,
            mean: sum / count as f64,
            min,
            max,
        })
    }
}

/// Result of aggregating a region collection against a raster
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Regions in input order with geometries in the output frame
    pub regions: RegionCollection,
    /// Statistics aligned with `regions`
    pub stats: Vec<Option<ZonalStats>>,
}

impl Aggregation {
    /// Statistics keyed by region id; on duplicate ids the last region wins
    pub fn by_id(&self) -> HashMap<&str, Option<ZonalStats>> {
        self.regions.iter()
            .zip(self.stats.iter())
            .map(|(region, stats)| (region.id(), *stats))
            .collect()
    }

    /// Non-missing means in region order
    pub fn means(&self) -> Vec<f64> {
        self.stats.iter().flatten().map(|s| s.mean).collect()
    }
}

/// Samples every region of a collection and reduces the samples
#[derive(Debug, Clone)]
pub struct ZonalAggregator {
    sampler: RasterSampler,
    reprojector: Reprojector,
    output_crs: String,
    show_progress: bool,
}

impl Default for ZonalAggregator {
    fn default() -> Self {
        Self::new(OUTPUT_CRS)
    }
}

impl ZonalAggregator {
    pub fn new(output_crs: impl Into<String>) -> Self {
        ZonalAggregator {
            sampler: RasterSampler::new(),
            reprojector: Reprojector::new(),
            output_crs: output_crs.into(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Compute statistics for every region
    ///
    /// The collection is reprojected into the raster's frame once and sampled
    /// region by region. Output geometries are the caller's, reprojected
    /// straight into the output frame.
    pub fn aggregate(&self, raster: &Raster, regions: &RegionCollection) -> ZonalResult<Aggregation> {
        info!("Aggregating {} regions against a {}x{} raster in {}",
              regions.len(), raster.width(), raster.height(), raster.crs());

        let working = self.reprojector.reproject_regions(regions, raster.crs())?;

        let progress = ProgressTracker::for_regions(working.len(), self.show_progress);

        let mut stats = Vec::with_capacity(working.len());
        for region in working.iter() {
            progress.start_region(region.id());
            let values = self.sampler.sample(raster, region.geometry());
            let sampled = values.len();
            let region_stats = ZonalStats::from_values(values.into_iter().filter(|v| !raster.is_missing(*v)));

            match &region_stats {
                Some(s) => debug!("Region '{}': {} cells, {} valid, mean {:.3}", region.id(), sampled, s.count, s.mean),
                None => debug!("Region '{}': no valid cells ({} sampled)", region.id(), sampled),
            }

            stats.push(region_stats);
            progress.region_done();
        }
        progress.finish();

        let regions = self.reprojector.reproject_regions(regions, &self.output_crs)?;

        Ok(Aggregation { regions, stats })
    }
}
