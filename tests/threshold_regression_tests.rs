//! Integration tests for layer generation
//!
//! These tests run the full pipeline (encode, classify, distribute, write)
//! and protect the reconstruction guarantee, the structural skeleton on
//! every layer and the all-or-nothing file output.

use layered_qr::{
    ECLevel, GeneratorConfig, LayerError, LayerGenerator, QrMatrix, RenderOptions,
    StructuralMask, ThresholdParams, distribute,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn subsets_of_size(n: usize, size: usize) -> Vec<Vec<usize>> {
    (0u32..(1 << n))
        .filter(|bits| bits.count_ones() as usize == size)
        .map(|bits| (0..n).filter(|i| bits & (1 << i) != 0).collect())
        .collect()
}

/// "A" split 5 ways with threshold 3
#[test]
fn test_single_letter_five_choose_three() {
    let matrix = QrMatrix::encode(b"A", ECLevel::L).unwrap();
    let mask = StructuralMask::for_version(matrix.version());
    let mut rng = StdRng::seed_from_u64(2024);
    let layers = distribute(&matrix, &mask, 3, 5, &mut rng).unwrap();
    assert_eq!(layers.params().copies_per_module(), 3);

    let threes = subsets_of_size(5, 3);
    assert_eq!(threes.len(), 10);
    for subset in &threes {
        let stacked = layers.stack(subset).unwrap();
        assert_eq!(&stacked, matrix.modules(), "subset {subset:?}");
    }

    // Each pair misses a given black data module with probability 1/10, and
    // version 1 carries on the order of a hundred of them.
    for pair in subsets_of_size(5, 2) {
        let stacked = layers.stack(&pair).unwrap();
        assert_ne!(&stacked, matrix.modules(), "pair {pair:?} revealed the code");
    }
}

#[test]
fn test_below_threshold_leaves_skeleton_visible() {
    let matrix = QrMatrix::encode(b"dead man's switch", ECLevel::M).unwrap();
    let mask = StructuralMask::for_version(matrix.version());
    let mut rng = StdRng::seed_from_u64(77);
    let layers = distribute(&matrix, &mask, 4, 4, &mut rng).unwrap();
    let size = matrix.size();

    for layer in &layers {
        for row in 0..size {
            for col in 0..size {
                if mask.is_structural(row, col) {
                    assert_eq!(layer.get(row, col), matrix.is_black(row, col));
                } else if layer.get(row, col) {
                    // Data ink only where the code is black
                    assert!(matrix.is_black(row, col));
                }
            }
        }
    }
}

#[test]
fn test_invalid_threshold_before_any_work() {
    let generator = LayerGenerator::default();
    assert!(matches!(
        ThresholdParams::new(0, 5),
        Err(LayerError::InvalidThreshold { k: 0, n: 5 })
    ));
    assert!(matches!(
        ThresholdParams::new(6, 5),
        Err(LayerError::InvalidThreshold { k: 6, n: 5 })
    ));
    // The generator itself only accepts validated params
    let params = ThresholdParams::new(5, 5).unwrap();
    assert!(generator.generate(b"ok", params).is_ok());
}

#[test]
fn test_high_version_reconstructs() {
    let data = vec![b'z'; 900];
    let matrix = QrMatrix::encode(&data, ECLevel::L).unwrap();
    assert!(matrix.version().number() >= 20);
    let mask = StructuralMask::for_version(matrix.version());
    let mut rng = StdRng::seed_from_u64(3);
    let layers = distribute(&matrix, &mask, 2, 4, &mut rng).unwrap();
    for pair in subsets_of_size(4, 2) {
        assert_eq!(&layers.stack(&pair).unwrap(), matrix.modules());
    }
}

#[test]
fn test_write_layers_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("nested").join("layers");
    let config = GeneratorConfig {
        output_dir: out_dir.clone(),
        prefix: "vault".to_string(),
        render: RenderOptions {
            module_pixels: 3,
            quiet_zone: 2,
        },
        seed: Some(8),
        ..GeneratorConfig::default()
    };
    let generator = LayerGenerator::new(config);
    let params = ThresholdParams::new(2, 3).unwrap();
    let generated = generator.generate(b"https://example.com", params).unwrap();
    let paths = generator.write(&generated).unwrap();

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "vault_layer_1_of_3.png",
            "vault_layer_2_of_3.png",
            "vault_layer_3_of_3.png"
        ]
    );

    let entries = std::fs::read_dir(&out_dir).unwrap().count();
    assert_eq!(entries, 3, "no temporary files left behind");

    let side = (generated.matrix.size() as u32 + 4) * 3;
    let img = image::open(&paths[0]).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (side, side));
    // Quiet zone corner is transparent, top-left finder corner is inked
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(6, 6).0, [0, 0, 0, 255]);
}

#[test]
fn test_write_failure_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the output directory should go
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"occupied").unwrap();

    let config = GeneratorConfig {
        output_dir: blocker.join("layers"),
        seed: Some(1),
        ..GeneratorConfig::default()
    };
    let generator = LayerGenerator::new(config);
    let params = ThresholdParams::new(2, 2).unwrap();
    let generated = generator.generate(b"nothing written", params).unwrap();
    let err = generator.write(&generated).unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_failed_write_keeps_previous_layers() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_path_buf();
    // A previous run's first layer, and a directory squatting on the second name
    let previous = out_dir.join("qr_layer_1_of_2.png");
    std::fs::write(&previous, b"previous layer one").unwrap();
    let squatter = out_dir.join("qr_layer_2_of_2.png");
    std::fs::create_dir(&squatter).unwrap();
    std::fs::write(squatter.join("keep.txt"), b"x").unwrap();

    let config = GeneratorConfig {
        output_dir: out_dir.clone(),
        seed: Some(5),
        ..GeneratorConfig::default()
    };
    let generator = LayerGenerator::new(config);
    let params = ThresholdParams::new(2, 2).unwrap();
    let generated = generator.generate(b"A", params).unwrap();
    let err = generator.write(&generated).unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");

    assert_eq!(std::fs::read(&previous).unwrap(), b"previous layer one");
    assert!(squatter.join("keep.txt").exists());
    let mut names: Vec<String> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["qr_layer_1_of_2.png", "qr_layer_2_of_2.png"]);
}

#[test]
fn test_rewrite_replaces_previous_layers() {
    let dir = tempfile::tempdir().unwrap();
    let previous = dir.path().join("qr_layer_1_of_2.png");
    std::fs::write(&previous, b"stale").unwrap();

    let config = GeneratorConfig {
        output_dir: dir.path().to_path_buf(),
        seed: Some(5),
        ..GeneratorConfig::default()
    };
    let generator = LayerGenerator::new(config);
    let params = ThresholdParams::new(2, 2).unwrap();
    let generated = generator.generate(b"A", params).unwrap();
    let paths = generator.write(&generated).unwrap();

    assert_eq!(paths.len(), 2);
    assert!(image::open(&previous).is_ok());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_bad_render_options_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("layers");
    let config = GeneratorConfig {
        output_dir: out_dir.clone(),
        render: RenderOptions {
            module_pixels: 0,
            quiet_zone: 4,
        },
        seed: Some(1),
        ..GeneratorConfig::default()
    };
    let generator = LayerGenerator::new(config);
    let params = ThresholdParams::new(1, 2).unwrap();
    let generated = generator.generate(b"zero px", params).unwrap();
    assert!(matches!(
        generator.write(&generated),
        Err(LayerError::InvalidRenderOptions { .. })
    ));
    assert!(!out_dir.exists());
}
