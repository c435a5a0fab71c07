use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to the scene description file
    #[arg()]
    pub scene: PathBuf,
    /// Path to save the render to; .ppm and .png are supported
    #[arg(short, long, default_value_os_t = PathBuf::from("output.ppm"))]
    pub output: PathBuf,
    /// Threads to use for rendering (0 for automatic setting)
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,
}
