use clap::Parser;

use lumen::framebuffer::FrameBuffer;
use lumen::renderer::Renderer;

use lumen_common::scene_loader::SceneLoader;

mod args;
mod writer;

use args::Args;

/// Exit status for every failure: bad usage, scene loading, writing.
const EXIT_FAILURE: i32 = 84;

fn main() {
    let args = match <Args as Parser>::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(EXIT_FAILURE);
        }
    };

    let scene = match SceneLoader::load_from_path(&args.scene) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("lumen: could not load scene description: {e}");
            std::process::exit(EXIT_FAILURE);
        }
    };

    let mut fb = FrameBuffer::new(scene.camera.width, scene.camera.height);

    let renderer = Renderer {
        threads: args.threads,
    };

    renderer.render(&scene, &mut fb);

    if let Err(e) = writer::write_image(&args.output, &fb) {
        eprintln!("lumen: could not write image: {e}");
        std::process::exit(EXIT_FAILURE);
    }

    println!("Image saved as {}", args.output.display());
}
