use armor_detector::image::io::{load_frame, save_frame, save_gray, write_json_file};
use armor_detector::{ArmorParams, ClassicalDetector, Detect, Frame, LightParams};
use std::path::Path;

fn main() {
    // Demo: `armor-detector [image] [out_dir]`. Without an image path a
    // synthetic dark frame is used; with an output directory the binary
    // mask, annotated overlay and JSON results are written there.
    let frame = match std::env::args().nth(1) {
        Some(path) => match load_frame(Path::new(&path)) {
            Ok(frame) => frame,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => {
            let (w, h) = (640usize, 480usize);
            Frame::from_gray8(w, h, vec![0u8; w * h]).expect("valid synthetic frame")
        }
    };

    let mut det = ClassicalDetector::new(160, LightParams::default(), ArmorParams::default());
    let armors = det.detect(&frame);
    println!("found {} armors", armors.len());
    for armor in &armors {
        let c = armor.center();
        println!("  label='{}' center=({:.1}, {:.1})", armor.label, c.x, c.y);
    }

    if let Some(out) = std::env::args().nth(2) {
        let out = Path::new(&out);
        if let Err(e) = dump_debug(&det, &frame, &armors, out) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        println!("debug output written to {}", out.display());
    }
}

fn dump_debug(
    det: &ClassicalDetector,
    frame: &Frame,
    armors: &[armor_detector::Armor],
    out: &Path,
) -> Result<(), String> {
    if let Some(mask) = det.binary_image() {
        save_gray(mask, &out.join("binary.png"))?;
    }
    save_frame(&det.draw_results(frame, armors), &out.join("overlay.png"))?;
    write_json_file(&out.join("armors.json"), &armors)
}
