mod common;

use anyhow::Result;
use common::TestProject;
use rstest::rstest;
use x2sync::SyncError;
use x2sync::commands::{self, update, verify};
use x2sync::config::{Config, LineEnding};
use x2sync::manifest::Manifest;
use x2sync::reconcile::{self, Mode, Outcome};

const NAMESPACED_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" DefaultTargets="Default" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <Name>MyMod</Name>
  </PropertyGroup>
  <ItemGroup>
    <Folder Include="Src\" />
  </ItemGroup>
  <ItemGroup>
    <Content Include="Src\Main.uc" />
  </ItemGroup>
  <Import Project="$(MSBuildLocalExtensionPath)\XCOM2.targets" />
</Project>
"#;

fn exclusion_config() -> Config {
    let mut config = Config::default();
    config.scan.exclude_contents = true;
    config
}

#[test]
fn test_update_merges_groups_in_namespaced_project() -> Result<()> {
    let project = TestProject::new(NAMESPACED_PROJECT)?;
    project.add_files(&["Src/Main.uc", "Src/Extra.uc", "Config/Mod.ini"])?;

    let summary = update::execute(&project.context()?)?;
    assert_eq!(summary.added_folders, vec!["Config"]);
    assert_eq!(summary.added_files, vec!["Config\\Mod.ini", "Src\\Extra.uc"]);
    assert_eq!(summary.groups_merged, 2);

    let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" DefaultTargets="Default" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <Name>MyMod</Name>
  </PropertyGroup>
  <Import Project="$(MSBuildLocalExtensionPath)\XCOM2.targets"/>
  <ItemGroup>
    <Folder Include="Src\"/>
    <Folder Include="Config"/>
    <Content Include="Src\Main.uc"/>
    <Content Include="Config\Mod.ini"/>
    <Content Include="Src\Extra.uc"/>
  </ItemGroup>
</Project>"#;
    assert_eq!(project.manifest_text()?, expected);
    Ok(())
}

#[test]
fn test_update_is_idempotent() -> Result<()> {
    let project = TestProject::new(NAMESPACED_PROJECT)?;
    project.add_files(&["Src/Main.uc", "Src/Deep/Nested/x.uc", "readme.txt"])?;
    let ctx = project.context()?;

    update::execute(&ctx)?;
    let first = project.manifest_bytes()?;

    let summary = update::execute(&ctx)?;
    assert!(summary.is_unchanged());
    assert_eq!(summary.groups_merged, 1);
    assert_eq!(project.manifest_bytes()?, first);
    Ok(())
}

#[test]
fn test_stale_entries_are_kept() -> Result<()> {
    let project = TestProject::new(
        "<Project><ItemGroup><Folder Include=\"Old\"/><Content Include=\"Old\\gone.txt\"/></ItemGroup></Project>",
    )?;
    project.add_file("new.txt")?;

    update::execute(&project.context()?)?;

    let text = project.manifest_text()?;
    assert!(text.contains("<Folder Include=\"Old\"/>"));
    assert!(text.contains("<Content Include=\"Old\\gone.txt\"/>"));
    assert!(text.contains("<Content Include=\"new.txt\"/>"));
    Ok(())
}

#[test]
fn test_verify_fails_exactly_when_update_would_add() -> Result<()> {
    let project = TestProject::new("<Project><ItemGroup/></Project>")?;
    project.add_files(&["A/b.txt", "c.txt"])?;
    let ctx = project.context()?;

    let err = verify::execute(&ctx).unwrap_err();
    match err.downcast_ref::<SyncError>() {
        Some(SyncError::VerificationFailed {
            missing_folders,
            missing_files,
        }) => {
            assert_eq!(missing_folders, &vec!["A".to_string()]);
            assert_eq!(missing_files, &vec!["A\\b.txt".to_string(), "c.txt".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let summary = update::execute(&ctx)?;
    assert_eq!(summary.added_folders, vec!["A"]);
    assert_eq!(summary.added_files, vec!["A\\b.txt", "c.txt"]);

    let discrepancies = verify::execute(&ctx)?;
    assert!(discrepancies.is_clean());
    Ok(())
}

#[test]
fn test_verify_does_not_write() -> Result<()> {
    let project = TestProject::new("<Project>\n<ItemGroup>\n</ItemGroup>\n<ItemGroup/></Project>")?;
    project.add_file("a.txt")?;
    let before = project.manifest_bytes()?;

    assert!(verify::execute(&project.context()?).is_err());
    assert_eq!(project.manifest_bytes()?, before);
    Ok(())
}

#[test]
fn test_trailing_separator_matches_folder() -> Result<()> {
    let project = TestProject::new(
        "<Project><ItemGroup><Folder Include=\"A\\\"/><Content Include=\"A\\x.txt\"/></ItemGroup></Project>",
    )?;
    project.add_file("A/x.txt")?;

    assert!(verify::execute(&project.context()?)?.is_clean());
    Ok(())
}

#[test]
fn test_bom_and_crlf_survive_update() -> Result<()> {
    let project = TestProject::with_bytes(
        b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n<Project>\r\n  <ItemGroup />\r\n</Project>\r\n",
    )?;
    project.add_file("a.txt")?;

    update::execute(&project.context()?)?;

    let bytes = project.manifest_bytes()?;
    assert!(bytes.starts_with(b"\xEF\xBB\xBF<?xml"));
    let text = String::from_utf8(bytes)?;
    assert!(text.contains("<Content Include=\"a.txt\"/>"));
    assert!(!text.replace("\r\n", "").contains('\n'));
    Ok(())
}

#[test]
fn test_line_ending_override() -> Result<()> {
    let project = TestProject::new("<Project>\r\n<ItemGroup/>\r\n</Project>")?;
    project.add_file("a.txt")?;

    let mut config = Config::default();
    config.manifest.line_ending = LineEnding::Lf;
    update::execute(&project.context_with(config)?)?;

    assert!(!project.manifest_text()?.contains('\r'));
    Ok(())
}

#[test]
fn test_in_place_write() -> Result<()> {
    let project = TestProject::new("<Project><ItemGroup/></Project>")?;
    project.add_file("a.txt")?;

    let mut config = Config::default();
    config.manifest.atomic_write = false;
    update::execute(&project.context_with(config)?)?;

    assert!(project.manifest_text()?.contains("a.txt"));
    Ok(())
}

#[test]
fn test_comments_and_other_items_are_preserved() -> Result<()> {
    let project = TestProject::new(
        "<Project><ItemGroup><!-- assets --><None Include=\"notes.md\"/><Content Include=\"a.txt\"/></ItemGroup></Project>",
    )?;
    project.add_file("a.txt")?;

    update::execute(&project.context()?)?;

    let text = project.manifest_text()?;
    assert!(text.contains("<!-- assets -->"));
    assert!(text.contains("<None Include=\"notes.md\"/>"));
    Ok(())
}

#[test]
fn test_property_text_is_left_alone() -> Result<()> {
    let project = TestProject::new(
        "<Project><PropertyGroup><Description>  My mod  </Description></PropertyGroup><ItemGroup/></Project>",
    )?;
    project.add_file("a.txt")?;

    update::execute(&project.context()?)?;

    assert!(
        project
            .manifest_text()?
            .contains("<Description>  My mod  </Description>")
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_update_keeps_manifest_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let project = TestProject::new("<Project><ItemGroup/></Project>")?;
    project.add_file("a.txt")?;
    std::fs::set_permissions(&project.manifest_path, std::fs::Permissions::from_mode(0o644))?;

    update::execute(&project.context()?)?;

    let mode = std::fs::metadata(&project.manifest_path)?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    Ok(())
}

#[test]
fn test_missing_include_aborts_before_writing() -> Result<()> {
    let project = TestProject::new("<Project><ItemGroup><Folder/></ItemGroup></Project>")?;
    project.add_file("a.txt")?;
    let before = project.manifest_bytes()?;

    let err = update::execute(&project.context()?).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SyncError>(),
        Some(SyncError::MissingInclude { group: 0, position: 0, .. })
    ));
    assert_eq!(project.manifest_bytes()?, before);
    Ok(())
}

#[test]
fn test_run_dispatches_on_mode() -> Result<()> {
    let project = TestProject::new("<Project><ItemGroup/></Project>")?;
    project.add_file("Dir/f.txt")?;
    let ctx = project.context()?;

    let err = commands::run(&ctx, Mode::Verify).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SyncError>(),
        Some(SyncError::VerificationFailed { .. })
    ));

    match commands::run(&ctx, Mode::Update)? {
        Outcome::Updated(summary) => {
            assert_eq!(summary.added_folders, vec!["Dir"]);
            assert_eq!(summary.added_files, vec!["Dir\\f.txt"]);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(project.manifest_text()?.contains("<Content Include=\"Dir\\f.txt\"/>"));

    match commands::run(&ctx, Mode::Verify)? {
        Outcome::Verified(discrepancies) => assert!(discrepancies.is_clean()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_reconciler_sees_in_memory_manifest() -> Result<()> {
    let project = TestProject::new("<Project><ItemGroup/></Project>")?;
    project.add_file("Dir/f.txt")?;
    let ctx = project.context()?;

    let scan = ctx.scanner().scan()?;
    let mut manifest = Manifest::load(&ctx.manifest_path)?;
    reconcile::update(&mut manifest, &scan)?;

    assert!(reconcile::verify(&manifest, &scan)?.is_clean());
    Ok(())
}

#[rstest]
#[case("Content/a.png", false)]
#[case("ContentSpecial/b.png", false)]
#[case("Contents/Deep/c.png", false)]
#[case("ContentThing.txt", true)]
#[case("Assets/Content/d.png", true)]
#[case("content/e.png", true)]
fn test_exclusion_filter(#[case] file: &str, #[case] kept: bool) -> Result<()> {
    let project = TestProject::new("<Project><ItemGroup/></Project>")?;
    project.add_file(file)?;

    let summary = update::execute(&project.context_with(exclusion_config())?)?;

    let expected = file.replace('/', "\\");
    assert_eq!(summary.added_files.contains(&expected), kept);
    if !kept {
        assert!(summary.added_folders.is_empty());
    }
    Ok(())
}

#[rstest]
#[case("Data")]
#[case("Raw")]
fn test_custom_excluded_prefix(#[case] prefix: &str) -> Result<()> {
    let project = TestProject::new("<Project><ItemGroup/></Project>")?;
    project.add_files(&["Data/a.txt", "Raw/b.txt", "Content/c.txt"])?;

    let mut config = exclusion_config();
    config.scan.excluded_prefix = prefix.to_string();
    let summary = update::execute(&project.context_with(config)?)?;

    assert!(summary.added_files.iter().all(|f| !f.starts_with(prefix)));
    assert!(summary.added_files.contains(&"Content\\c.txt".to_string()));
    Ok(())
}
