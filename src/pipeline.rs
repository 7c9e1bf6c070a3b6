//! Entry point: annotate a region collection with raster statistics and classes

use log::info;

use crate::aggregator::ZonalAggregator;
use crate::classifier::{ClassificationScheme, Classifier};
use crate::config::PipelineConfig;
use crate::coordinate::OUTPUT_CRS;
use crate::errors::ZonalResult;
use crate::raster::Raster;
use crate::vector::RegionCollection;

/// Annotated regions together with the scheme used to classify them
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRegions {
    /// Regions in input order, geometries in the output frame
    pub regions: RegionCollection,
    pub scheme: ClassificationScheme,
}

/// Runs reprojection, aggregation and classification once per call
///
/// Holds no state between calls; every run recomputes from its inputs.
#[derive(Debug, Clone)]
pub struct StatsPipeline {
    aggregator: ZonalAggregator,
    classifier: Classifier,
}

impl Default for StatsPipeline {
    fn default() -> Self {
        Self::new(OUTPUT_CRS)
    }
}

impl StatsPipeline {
    pub fn new(output_crs: impl Into<String>) -> Self {
        StatsPipeline {
            aggregator: ZonalAggregator::new(output_crs),
            classifier: Classifier::new(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        StatsPipeline {
            aggregator: ZonalAggregator::new(config.output.crs.clone())
                .with_progress(config.show_progress),
            classifier: Classifier::new(),
        }
    }

    /// Annotate `regions` with statistics from `raster` and a class per region
    pub fn run(&self, raster: &Raster, regions: &RegionCollection) -> ZonalResult<AnnotatedRegions> {
        let aggregation = self.aggregator.aggregate(raster, regions)?;

        let means: Vec<Option<f64>> = aggregation.stats.iter()
            .map(|stats| stats.map(|s| s.mean))
            .collect();
        let (scheme, classes) = self.classifier.classify(&means);

        let mut annotated = aggregation.regions;
        for ((region, stats), class) in annotated.iter_mut().zip(aggregation.stats).zip(classes) {
            region.annotate(stats, class);
        }

        let covered = means.iter().filter(|m| m.is_some()).count();
        info!("Annotated {} regions ({} with statistics) in {}", annotated.len(), covered, annotated.crs());

        Ok(AnnotatedRegions { regions: annotated, scheme })
    }
}

/// Annotate regions with default settings, output in EPSG:4326
pub fn annotate(raster: &Raster, regions: &RegionCollection) -> ZonalResult<RegionCollection> {
    StatsPipeline::default().run(raster, regions).map(|annotated| annotated.regions)
}
