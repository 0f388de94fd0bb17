use animfix_binding_core::{
    AlwaysOverwrite, AnimationClip, AttachedClips, BindingPath, BindingIssue, ClipId, ClipLibrary,
    ComponentType, ConversionCandidate, ConversionRule, Curve, CurveBinding, CurveStore, Extension,
    ExtensionRegistry, Fixer, FixerConfig, HistoryLog, Hooks, NeverOverwrite, SceneTree,
    StaticClips,
};
use animfix_test_fixtures::{clip_libraries, configs, scenes};

fn p(s: &str) -> BindingPath {
    BindingPath::parse(s).unwrap()
}

fn ty(s: &str) -> ComponentType {
    ComponentType::from(s)
}

fn avatar_fixer() -> anyhow::Result<Fixer<SceneTree>> {
    let config = FixerConfig::from_json_str(&configs::json("physbone")?)?;
    let mut fixer = Fixer::new(config)?;
    fixer
        .registry_mut()
        .add_clip_source(Box::new(AttachedClips { recursive: false }));
    Ok(fixer)
}

#[test]
fn scan_classifies_avatar_bindings() -> anyhow::Result<()> {
    let scene: SceneTree = scenes::load("avatar")?;
    let library: ClipLibrary = clip_libraries::load("avatar-clips")?;
    let fixer = avatar_fixer()?;

    let scan = fixer.scan(&scene, scene.root(), &library);
    let clips: Vec<&str> = scan.clips.iter().map(ClipId::as_str).collect();
    assert_eq!(clips, vec!["Idle", "Wave", "Blink"]);

    let path_broken: Vec<String> = scan.broken.path_broken.iter().map(|p| p.to_string()).collect();
    assert_eq!(path_broken, vec!["Hips/Spine"]);
    assert_eq!(scan.broken.type_broken.len(), 2);
    assert!(scan.broken.type_broken[&p("Body")].contains(&ty("SkinnedMeshRenderer")));
    assert!(scan.broken.type_broken[&p("Hair")].contains(&ty("DynamicBone")));
    // Bindings of clips outside the scanned set are never reported.
    assert!(!scan.broken.path_broken.contains(&p("Tail")));

    assert_eq!(
        scan.candidates,
        vec![
            ConversionCandidate {
                path: p("Body"),
                from: ty("SkinnedMeshRenderer"),
                to: ty("MeshRenderer"),
            },
            ConversionCandidate {
                path: p("Hair"),
                from: ty("DynamicBone"),
                to: ty("PhysBone"),
            },
        ]
    );
    assert!(scan
        .broken
        .issues()
        .contains(&BindingIssue::PathResolutionFailure { path: p("Hips/Spine") }));
    Ok(())
}

#[test]
fn operator_repairs_avatar_step_by_step() -> anyhow::Result<()> {
    let scene: SceneTree = scenes::load("avatar")?;
    let mut library: ClipLibrary = clip_libraries::load("avatar-clips")?;
    let fixer = avatar_fixer()?;
    let scan = fixer.scan(&scene, scene.root(), &library);
    let mut history = HistoryLog::new();

    // Decline every overwrite: Wave already animates Hips/Chest rotation x.
    let mut decline = NeverOverwrite;
    let report = fixer.fix_path(
        &mut library,
        &scan.clips,
        &p("Hips/Spine"),
        &p("Hips/Chest"),
        &mut Hooks::new(&mut history, &mut decline),
    )?;
    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].clip, ClipId::from("Wave"));
    let wave = library.get(&ClipId::from("Wave")).unwrap();
    assert_eq!(
        wave.curve(&CurveBinding::new(p("Hips/Chest"), "Transform", "m_LocalRotation.x")),
        Some(&Curve::scalar([(0.0, 0.9)]))
    );
    assert!(wave.contains(&CurveBinding::new(p("Hips/Spine"), "Transform", "m_LocalRotation.x")));
    let recorded: Vec<&str> = history.current_group().map(|e| e.object.as_str()).collect();
    assert_eq!(recorded, vec!["Idle", "Wave"]);

    let mut decline = NeverOverwrite;
    let report = fixer.fix_type(
        &mut library,
        &scan.clips,
        &p("Body"),
        &ty("SkinnedMeshRenderer"),
        &mut Hooks::new(&mut history, &mut decline),
    )?;
    assert_eq!(report.applied.len(), 3);
    let blink = library.get(&ClipId::from("Blink")).unwrap();
    assert!(blink.contains(&CurveBinding::new(p("Body"), "MeshRenderer", "m_Materials.Array.data[0]")));

    let report = fixer.fix_type(
        &mut library,
        &scan.clips,
        &p("Hair"),
        &ty("DynamicBone"),
        &mut Hooks::new(&mut history, &mut decline),
    )?;
    assert_eq!(report.applied.len(), 1);

    let rescan = fixer.scan(&scene, scene.root(), &library);
    assert!(rescan.broken.type_broken.is_empty());
    assert_eq!(rescan.broken.path_broken.len(), 1);

    let mut accept = AlwaysOverwrite;
    let report = fixer.fix_path(
        &mut library,
        &scan.clips,
        &p("Hips/Spine"),
        &p("Hips/Chest"),
        &mut Hooks::new(&mut history, &mut accept),
    )?;
    assert!(report.applied[0].overwrote);
    let wave = library.get(&ClipId::from("Wave")).unwrap();
    assert_eq!(
        wave.curve(&CurveBinding::new(p("Hips/Chest"), "Transform", "m_LocalRotation.x")),
        Some(&Curve::scalar([(0.0, 0.1)]))
    );
    assert!(fixer.scan(&scene, scene.root(), &library).is_clean());
    assert_eq!(history.groups(), 4);
    Ok(())
}

#[test]
fn duplicate_siblings_resolve_to_first_match() -> anyhow::Result<()> {
    let scene: SceneTree = scenes::load("avatar-duplicate-arms")?;
    let library: ClipLibrary = [AnimationClip::new("Wave").with_curve(
        CurveBinding::new(p("Arm"), "MeshRenderer", "m_Enabled"),
        Curve::scalar([(0.0, 1.0)]),
    )]
    .into_iter()
    .collect();
    let fixer = avatar_fixer()?;
    let scan = fixer.scan(&scene, scene.root(), &library);
    assert!(scan.broken.ambiguous.contains(&p("Arm")));
    assert!(scan.broken.type_broken[&p("Arm")].contains(&ty("MeshRenderer")));
    Ok(())
}

struct PhysBoneIntegration;

impl Extension<SceneTree> for PhysBoneIntegration {
    fn name(&self) -> &str {
        "PhysBone migration"
    }

    fn clip_source(&self) -> Option<Box<dyn animfix_binding_core::ClipSource<SceneTree>>> {
        Some(Box::new(StaticClips(vec![ClipId::from("Unused")])))
    }

    fn conversions(&self) -> Vec<ConversionRule> {
        vec![ConversionRule::identity("DynamicBone", "PhysBone")]
    }
}

#[test]
fn extensions_contribute_clips_and_conversions() -> anyhow::Result<()> {
    let scene: SceneTree = scenes::load("avatar")?;
    let library: ClipLibrary = clip_libraries::load("avatar-clips")?;
    let mut registry: ExtensionRegistry<SceneTree> = ExtensionRegistry::new();
    registry.add_clip_source(Box::new(AttachedClips { recursive: true }));
    registry.register(PhysBoneIntegration)?;
    assert_eq!(registry.integrations(), &["PhysBone migration".to_string()]);

    let fixer = Fixer::with_registry(registry, FixerConfig::default());
    let scan = fixer.scan(&scene, scene.root(), &library);
    assert_eq!(scan.clips.len(), 4);
    assert!(scan.broken.path_broken.contains(&p("Tail")));
    // Only the extension's rule is registered; the renderer swap is not offered.
    let offered: Vec<&str> = scan.candidates.iter().map(|c| c.to.as_str()).collect();
    assert_eq!(offered, vec!["PhysBone"]);
    Ok(())
}
