//! End-to-end assembly tests against a synthetic build and source tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

use mrdist::{DistAssembler, ProjectConfig, SourceLayout, Variant};

struct Fixture {
    _temp: TempDir,
    layout: SourceLayout,
    build_root: PathBuf,
    source_root: PathBuf,
    out_root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempdir().expect("failed to create temp dir");
        let root = temp.path();
        let build_root = root.join("BUILD");
        let source_root = root.join("src");
        let out_root = root.join("out");

        // One 32-bit Linux build with a versioned renderer and one host
        // application module.
        let build = build_root.join("Linux-centos4-32");
        write(&build.join("Release/bin/raydiff"), b"bin");
        write(&build.join("Release/bin/raydiff.pdb"), b"symbols");
        write(&build.join("Release/bin/notes.txt~"), b"backup");

        let renderer = build.join("Release/lib/mentalray3.4/3.4.1");
        write(&renderer.join("gg_shader.so"), b"shader");
        write(&renderer.join("gg_shader.exp"), b"stub");
        write(&renderer.join("readme.txt"), b"text");
        write(&renderer.join("libmrLibrary.so"), b"bare");
        write(&renderer.join("libmrLibrary.so.1"), b"one");
        write(&renderer.join("libmrLibrary.so.2"), b"two");

        let module = build.join("Release/lib/maya8.5-x64");
        write(&module.join("mrLiquid.so"), b"plugin");
        write(&module.join("mrLiquid-demo.so"), b"demo plugin");
        write(&module.join("mrLiquid.exp"), b"stub");
        write(&module.join("lib/libaux.so"), b"aux");
        fs::create_dir_all(module.join("lib/nested")).unwrap();
        write(&module.join("bin/mrtool"), b"tool");

        // Source tree inputs.
        write(&source_root.join("doc/Instructions.pdf"), b"pdf");
        write(
            &source_root.join("installers/License_Commercial.txt"),
            b"license",
        );
        write(&source_root.join("config/mrLiquid.mod"), b"module file");
        write(&source_root.join("config/stale.mod~"), b"backup");
        write(&source_root.join("mrClasses/GGShaderLib/mi/base.mi"), b"mi");
        write(&source_root.join("mrLiquid/src/shaders/extra.mi"), b"mi");
        write(
            &source_root.join("mrLiquid/scripts/maya8.5/startup.mel"),
            b"mel",
        );
        write(&source_root.join("rubyMEL/scripts/helpers.mel"), b"mel");
        write(
            &source_root.join("mrClasses/GGShaderLib/AEtemplates/AEgg.mel"),
            b"mel",
        );
        write(
            &source_root.join("mrClasses/GGShaderLib/icons/gg.xpm"),
            b"icon",
        );
        write(&source_root.join("mrLiquid/icons/liquid.xpm"), b"icon");

        Self {
            _temp: temp,
            layout: ProjectConfig::default().into_layout(),
            build_root,
            source_root,
            out_root,
        }
    }

    fn assemble(&self, variant: &Variant) -> PathBuf {
        let assembler = DistAssembler::new(&self.layout, &self.build_root, &self.source_root);
        let report = assembler
            .assemble(&self.out_root, variant)
            .expect("assembly failed");
        assert!(report.is_clean(), "unexpected skips: {report}");
        self.out_root.clone()
    }
}

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap_or_else(|_| panic!("missing dir {}", dir.display()))
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Recursive snapshot of an output tree: relative path to file contents, with
/// symlinks recorded by their target.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut map = BTreeMap::new();
    snapshot_into(root, root, &mut map);
    map
}

fn snapshot_into(root: &Path, dir: &Path, map: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap().flatten() {
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap().to_path_buf();
        let meta = fs::symlink_metadata(&path).unwrap();
        if meta.file_type().is_symlink() {
            let target = fs::read_link(&path).unwrap();
            map.insert(relative, target.to_string_lossy().into_owned().into_bytes());
        } else if meta.is_dir() {
            map.insert(relative.clone(), Vec::new());
            snapshot_into(root, &path, map);
        } else {
            map.insert(relative, fs::read(&path).unwrap());
        }
    }
}

#[test]
fn full_variant_selects_non_demo_plugins() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);

    let plugins = out.join("Linux-x86/i686/maya8.5-x64/plug-ins");
    assert_eq!(file_names(&plugins), vec!["mrLiquid.so"]);
}

#[test]
fn demo_variant_selects_only_demo_plugins() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::demo());

    let plugins = out.join("Linux-x86/i686/maya8.5-x64/plug-ins");
    assert_eq!(file_names(&plugins), vec!["mrLiquid-demo.so"]);
}

#[test]
fn common_binaries_exclude_symbols_and_backups() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);

    let bin = out.join("Linux-x86/i686/bin");
    assert_eq!(file_names(&bin), vec!["raydiff"]);
}

#[cfg(unix)]
#[test]
fn versioned_library_gets_a_relative_symlink() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);

    let shaders = out.join("Linux-x86/i686/shaders/mentalray3.4/3.4.1");
    assert!(shaders.join("libmrLibrary.so.1").is_file());
    assert!(shaders.join("libmrLibrary.so.2").is_file());

    let link = shaders.join("libmrLibrary.so");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    // The last versioned file in name order wins.
    assert_eq!(fs::read_link(&link).unwrap(), Path::new("./libmrLibrary.so.2"));
    assert_eq!(fs::read(&link).unwrap(), b"two");
}

#[test]
fn shader_directory_filters_and_metadata() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);

    let shaders = out.join("Linux-x86/i686/shaders/mentalray3.4/3.4.1");
    let names = file_names(&shaders);
    assert!(names.contains(&"gg_shader.so".to_string()));
    assert!(!names.contains(&"gg_shader.exp".to_string()));
    assert!(!names.contains(&"readme.txt".to_string()));
    // Auxiliary .mi metadata lands beside the shaders.
    assert!(names.contains(&"base.mi".to_string()));
    assert!(names.contains(&"extra.mi".to_string()));
}

#[test]
fn host_module_tree_is_fully_populated() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);

    let module = out.join("Linux-x86/i686/maya8.5-x64");
    for sub in ["bin", "lib", "icons", "plug-ins", "scripts", "resources/en"] {
        assert!(module.join(sub).is_dir(), "missing module dir {sub}");
    }

    // Config files land at the module root; backups do not.
    assert!(module.join("mrLiquid.mod").is_file());
    assert!(!module.join("stale.mod~").exists());

    // Scripts come from the version-keyed directory plus the two fixed ones.
    assert_eq!(
        file_names(&module.join("scripts")),
        vec!["AEgg.mel", "helpers.mel", "startup.mel"]
    );
    assert_eq!(
        file_names(&module.join("icons")),
        vec!["gg.xpm", "liquid.xpm"]
    );

    // Auxiliary files are regular files only.
    assert_eq!(file_names(&module.join("lib")), vec!["libaux.so"]);
    assert_eq!(file_names(&module.join("bin")), vec!["mrtool"]);
}

#[test]
fn missing_build_directories_are_skipped_silently() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);

    assert!(out.join("Linux-x86/i686").is_dir());
    assert!(!out.join("Linux-x86/x86_64").exists());
    assert!(!out.join("Windows").exists());
    assert!(!out.join("OSX").exists());
}

#[test]
fn docs_are_installed_with_a_renamed_license() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);

    assert_eq!(fs::read(out.join("docs/Instructions.pdf")).unwrap(), b"pdf");
    assert_eq!(fs::read(out.join("docs/LICENSE.txt")).unwrap(), b"license");
}

#[test]
fn reassembly_produces_an_identical_tree() {
    let fixture = Fixture::new();
    let out = fixture.assemble(&Variant::Full);
    let first = snapshot(&out);

    fixture.assemble(&Variant::Full);
    let second = snapshot(&out);

    assert_eq!(first, second);
}

#[test]
fn renderer_without_subversions_uses_a_single_flat_directory() {
    let temp = tempdir().unwrap();
    let build_root = temp.path().join("BUILD");
    let source_root = temp.path().join("src");
    fs::create_dir_all(&source_root).unwrap();

    let renderer = build_root.join("Linux-centos4-64/Release/lib/mentalray3.5");
    write(&renderer.join("gg_flat.so"), b"shader");

    let layout = ProjectConfig::default().into_layout();
    let assembler = DistAssembler::new(&layout, &build_root, &source_root);
    let out = temp.path().join("out");
    let report = assembler.assemble(&out, &Variant::Full).unwrap();
    assert!(report.is_clean());

    let shaders = out.join("Linux-x86/x86_64/shaders/mentalray3.5");
    assert_eq!(file_names(&shaders), vec!["gg_flat.so"]);
}
