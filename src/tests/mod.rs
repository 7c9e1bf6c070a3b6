
mod classifier_tests;
mod sampler_tests;
mod aggregator_tests;
mod coordinate_tests;
mod compression_tests;
