//! Distribution assembly orchestrator.
//!
//! [`DistAssembler::assemble`] turns one build output tree plus the project
//! source tree into a complete installable tree for one variant. The output
//! root is deleted and rebuilt from scratch on every run, which makes a
//! single run idempotent. Concurrent runs against the same output root are
//! not synchronised; callers must serialise them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::filters;
use crate::fsops;
use crate::layout::SourceLayout;
use crate::platform::{Architecture, Platform, PLATFORMS};
use crate::report::RunReport;
use crate::variant::Variant;

/// Fixed subdirectories created inside every host application module.
const MODULE_DIRS: [&str; 6] = ["bin", "lib", "icons", "plug-ins", "scripts", "resources/en"];

/// Assembles installable distribution trees from build output.
pub struct DistAssembler<'a> {
    layout: &'a SourceLayout,
    build_root: &'a Path,
    source_root: &'a Path,
}

impl<'a> DistAssembler<'a> {
    /// Create an assembler over a build output root and a source tree root.
    pub fn new(layout: &'a SourceLayout, build_root: &'a Path, source_root: &'a Path) -> Self {
        Self {
            layout,
            build_root,
            source_root,
        }
    }

    /// Produce a complete distribution tree for one variant.
    ///
    /// The output root is removed and recreated first; failure to do so
    /// aborts the run. Everything after that is best effort: a missing
    /// source directory contributes nothing, and individual copy failures
    /// are logged, recorded in the report and skipped.
    pub fn assemble(&self, output_root: &Path, variant: &Variant) -> Result<RunReport> {
        info!(
            "assembling {} distribution into {}",
            variant,
            output_root.display()
        );
        let mut report = RunReport::default();

        self.reset_output_root(output_root, &mut report)?;
        self.stage_docs(output_root, &mut report)?;

        for platform in PLATFORMS {
            for &arch in platform.architectures() {
                let Some(build_dir) = self.find_build_dir(platform, arch) else {
                    debug!("no build directory for {platform}/{arch}, skipping");
                    continue;
                };
                info!("staging {platform}/{arch} from {}", build_dir.display());

                let arch_out = output_root.join(platform.dir_name()).join(arch.dir_name());
                self.stage_common_binaries(&build_dir, &arch_out, &mut report)?;
                self.stage_renderer_shaders(&build_dir, &arch_out, &mut report)?;
                self.stage_host_modules(&build_dir, &arch_out, variant, &mut report)?;
            }
        }

        Ok(report)
    }

    /// Delete and recreate the output root. This is the one unrecoverable
    /// stage: a root that cannot be reset aborts the whole run.
    fn reset_output_root(&self, output_root: &Path, report: &mut RunReport) -> Result<()> {
        if output_root.exists() {
            info!("rm -r {}", output_root.display());
            fs::remove_dir_all(output_root)
                .with_context(|| format!("failed to remove {}", output_root.display()))?;
        }
        self.make_dir(output_root, report)
    }

    /// Install the instructions document and the license into `docs/`.
    fn stage_docs(&self, output_root: &Path, report: &mut RunReport) -> Result<()> {
        let dest = output_root.join("docs");
        self.make_dir(&dest, report)?;

        let instructions = self.layout.instructions_doc_path(self.source_root);
        if let Some(name) = instructions.file_name() {
            self.install_file_as(&instructions, &dest.join(name), report);
        }

        let license = self.layout.license_path(self.source_root);
        self.install_file_as(&license, &dest.join(&self.layout.license_name), report);
        Ok(())
    }

    /// Install release binaries and root-level extras into `{arch}/bin`.
    fn stage_common_binaries(
        &self,
        build_dir: &Path,
        arch_out: &Path,
        report: &mut RunReport,
    ) -> Result<()> {
        let dest = arch_out.join("bin");
        self.make_dir(&dest, report)?;

        let mut candidates = sorted_entries(&build_dir.join(&self.layout.release_bin_dir));
        candidates.extend(sorted_entries(&self.layout.extra_bin_path(self.source_root)));

        for path in candidates {
            let name = entry_name(&path);
            if filters::is_ignored_extension(&name) || filters::is_backup_file(&name) {
                continue;
            }
            self.install_into(&path, &dest, report);
        }
        Ok(())
    }

    /// Install shader libraries and `.mi` metadata for every renderer engine
    /// build found under the release library directory.
    fn stage_renderer_shaders(
        &self,
        build_dir: &Path,
        arch_out: &Path,
        report: &mut RunReport,
    ) -> Result<()> {
        let lib_dir = build_dir.join(&self.layout.release_lib_dir);
        for renderer_dir in dirs_with_prefix(&lib_dir, &self.layout.renderer_prefix) {
            let renderer = entry_name(&renderer_dir);
            let renderer_out = arch_out.join("shaders").join(renderer.as_ref());
            self.make_dir(&renderer_out, report)?;

            // Renderer builds may carry sub-version directories; a build
            // without them is treated as a single unnamed sub-version.
            let mut versions: Vec<String> = sorted_entries(&renderer_dir)
                .into_iter()
                .filter(|path| path.is_dir())
                .map(|path| entry_name(&path).into_owned())
                .collect();
            if versions.is_empty() {
                versions.push(String::new());
            }

            for version in &versions {
                let source_dir = if version.is_empty() {
                    renderer_dir.clone()
                } else {
                    renderer_dir.join(version)
                };
                let version_out = if version.is_empty() {
                    renderer_out.clone()
                } else {
                    renderer_out.join(version)
                };
                self.make_dir(&version_out, report)?;

                self.stage_shader_dir(&source_dir, &version_out, report);
                self.stage_mi_files(&version_out, report);
            }
        }
        Ok(())
    }

    /// Install the shader payloads of one renderer sub-version directory.
    fn stage_shader_dir(&self, source_dir: &Path, dest: &Path, report: &mut RunReport) {
        let library = &self.layout.versioned_library;
        for path in sorted_entries(source_dir) {
            let name = entry_name(&path);
            if filters::is_ignored_extension(&name) || !filters::is_shader_file(&name) {
                continue;
            }
            // The bare library name is never shipped directly; it is
            // recreated as a relative symlink to the versioned flavour.
            if name.as_ref() == library.as_str() {
                continue;
            }
            if filters::is_versioned_library(&name, library) {
                self.install_into(&path, dest, report);
                let link = dest.join(library);
                match fsops::relative_symlink(&name, &link) {
                    Ok(()) => report.linked(),
                    Err(err) => {
                        warn!("skipping link {}: {err}", link.display());
                        report.skip(path.clone(), err);
                    }
                }
            } else {
                self.install_into(&path, dest, report);
            }
        }
    }

    /// Install every `.mi` metadata file from the auxiliary source
    /// directories into a shader sub-version directory.
    fn stage_mi_files(&self, dest: &Path, report: &mut RunReport) {
        for mi_dir in self.layout.mi_paths(self.source_root) {
            for path in sorted_entries(&mi_dir) {
                if filters::has_extension(&entry_name(&path), "mi") {
                    self.install_into(&path, dest, report);
                }
            }
        }
    }

    /// Build the per-host-application-version module trees: config files,
    /// plug-ins, scripts, icons and auxiliary libraries and executables.
    fn stage_host_modules(
        &self,
        build_dir: &Path,
        arch_out: &Path,
        variant: &Variant,
        report: &mut RunReport,
    ) -> Result<()> {
        let lib_dir = build_dir.join(&self.layout.release_lib_dir);
        for module_dir in dirs_with_prefix(&lib_dir, &self.layout.host_prefix) {
            let module = entry_name(&module_dir).into_owned();
            let version_key = self.layout.module_version_key(&module).to_owned();

            let dest = arch_out.join(&module);
            self.make_dir(&dest, report)?;
            for sub in MODULE_DIRS {
                self.make_dir(&dest.join(sub), report)?;
            }

            for path in sorted_entries(&self.layout.config_path(self.source_root)) {
                if !filters::is_backup_file(&entry_name(&path)) {
                    self.install_into(&path, &dest, report);
                }
            }

            self.stage_plugins(&module_dir, &dest.join("plug-ins"), variant, report);
            self.stage_scripts(&version_key, &dest.join("scripts"), report);
            self.stage_icons(&dest.join("icons"), report);
            self.stage_aux_files(&module_dir.join("lib"), &dest.join("lib"), report);
            self.stage_aux_files(&module_dir.join("bin"), &dest.join("bin"), report);
        }
        Ok(())
    }

    /// Install the plugin binaries selected by the distribution variant.
    fn stage_plugins(
        &self,
        module_dir: &Path,
        dest: &Path,
        variant: &Variant,
        report: &mut RunReport,
    ) {
        for path in sorted_entries(module_dir) {
            let name = entry_name(&path);
            if filters::is_ignored_extension(&name) || !filters::is_plugin_binary(&name) {
                continue;
            }
            if !variant.includes_plugin_name(&name) {
                continue;
            }
            self.install_into(&path, dest, report);
        }
    }

    /// Install MEL scripts from the version-keyed directory and the two
    /// version-independent ones.
    fn stage_scripts(&self, version_key: &str, dest: &Path, report: &mut RunReport) {
        let mut script_dirs = vec![self.layout.versioned_scripts_path(self.source_root, version_key)];
        script_dirs.extend(self.layout.script_paths(self.source_root));

        for dir in script_dirs {
            for path in sorted_entries(&dir) {
                if filters::has_extension(&entry_name(&path), "mel") {
                    self.install_into(&path, dest, report);
                }
            }
        }
    }

    /// Install icon files from the icon source directories.
    fn stage_icons(&self, dest: &Path, report: &mut RunReport) {
        for dir in self.layout.icon_paths(self.source_root) {
            for path in sorted_entries(&dir) {
                if filters::has_extension(&entry_name(&path), "xpm") {
                    self.install_into(&path, dest, report);
                }
            }
        }
    }

    /// Install auxiliary regular files (module `lib/` and `bin/` contents).
    fn stage_aux_files(&self, source_dir: &Path, dest: &Path, report: &mut RunReport) {
        for path in sorted_entries(source_dir) {
            if path.is_dir() || filters::is_ignored_extension(&entry_name(&path)) {
                continue;
            }
            self.install_into(&path, dest, report);
        }
    }

    /// Locate the build directory for a platform/architecture pair by
    /// matching `{os}-*-{bits}` under the build root. The first match in
    /// name order is used; no match means the pair is skipped.
    fn find_build_dir(&self, platform: Platform, arch: Architecture) -> Option<PathBuf> {
        let prefix = format!("{}-", platform.os_family());
        let suffix = format!("-{}", arch.bit_width());
        sorted_entries(self.build_root).into_iter().find(|path| {
            let name = entry_name(path);
            path.is_dir()
                && name.len() >= prefix.len() + suffix.len()
                && name.starts_with(&prefix)
                && name.ends_with(&suffix)
        })
    }

    fn make_dir(&self, dir: &Path, report: &mut RunReport) -> Result<()> {
        let existed = dir.is_dir();
        fsops::ensure_dir(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        if !existed {
            report.dir_created();
        }
        Ok(())
    }

    /// Install a file or directory into a destination directory, recording
    /// the outcome. Failures are logged and skipped, never fatal.
    fn install_into(&self, source: &Path, dest_dir: &Path, report: &mut RunReport) {
        match fsops::install_into(source, dest_dir) {
            Ok(()) => report.installed(),
            Err(err) => {
                warn!("skipping {}: {err}", source.display());
                report.skip(source.to_path_buf(), err);
            }
        }
    }

    /// Install a file at an exact destination path. A missing source is the
    /// normal zero-work case and is not recorded as a failure.
    fn install_file_as(&self, source: &Path, destination: &Path, report: &mut RunReport) {
        if !source.exists() {
            debug!("source {} not present, skipping", source.display());
            return;
        }
        match fsops::install_file(source, destination) {
            Ok(()) => report.installed(),
            Err(err) => {
                warn!("skipping {}: {err}", source.display());
                report.skip(source.to_path_buf(), err);
            }
        }
    }
}

/// All entries of a directory in name order. A missing or unreadable
/// directory is the zero-work case and yields nothing.
fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|entry| entry.path()).collect(),
        Err(_) => Vec::new(),
    };
    paths.sort();
    paths
}

/// Subdirectories of `dir` whose name starts with `prefix`, in name order.
fn dirs_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    sorted_entries(dir)
        .into_iter()
        .filter(|path| path.is_dir() && entry_name(path).starts_with(prefix))
        .collect()
}

fn entry_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name().unwrap_or_default().to_string_lossy()
}
