use crate::casts::CastCategory;
use crate::classify::{DispelState, RaiseState, TargetClassification};
use crate::context::{Color, HighlightConfig, RectType, resolve};
use crate::identity::ActorId;
use crate::observer::{Capabilities, GroupKind};

/// Display data for one category (raise or dispel) on one actor
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub category: CastCategory,
    pub label: &'static str,
    pub color: Color,
    pub background_color: Color,
    pub frame_visible: bool,
    pub icon_visible: bool,
    pub world_text_visible: bool,
    pub world_text: &'static str,
    pub caster_name_text: Option<String>,
    /// Raise cast completion, when cast progress display is on
    pub progress: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescription {
    pub actor: ActorId,
    pub name: String,
    pub raise: Option<Highlight>,
    pub dispel: Option<Highlight>,
    pub rect_type: RectType,
    pub icon_scale: f32,
}

impl RenderDescription {
    pub fn is_empty(&self) -> bool {
        self.raise.is_none() && self.dispel.is_none()
    }

    /// Color for the group frame. Raise wins when both want the frame.
    pub fn frame_color(&self) -> Option<Color> {
        [&self.raise, &self.dispel]
            .into_iter()
            .flatten()
            .find(|h| h.frame_visible)
            .map(|h| h.color)
    }
}

/// Project one classification through the current display settings.
///
/// Each visibility flag is ANDed with the category's state being non-`None`;
/// a category whose state is `None`, or that is switched off or gated by
/// the job restriction, yields no `Highlight` at all.
pub fn project(
    classification: &TargetClassification,
    config: &HighlightConfig,
    capabilities: Capabilities,
) -> RenderDescription {
    let raise = raise_color(classification.raise, config).filter(|_| {
        category_active(config, CastCategory::Raise, capabilities)
    });
    let dispel = dispel_color(classification.dispel, config).filter(|_| {
        category_active(config, CastCategory::Dispel, capabilities)
    });

    let is_self = classification.group == GroupKind::LocalPlayer;
    let frame_visible = match classification.group {
        GroupKind::LocalPlayer => config.show_self,
        GroupKind::Party => config.show_group_frame,
        GroupKind::Alliance => config.show_alliance_frame,
        GroupKind::Other => false,
    };
    let symbols_allowed = !(is_self && config.hide_symbols_on_self);

    let raise = raise.map(|color| Highlight {
        category: CastCategory::Raise,
        label: classification.raise.label(),
        color,
        background_color: config.in_world_background_color,
        frame_visible,
        icon_visible: config.show_icon && symbols_allowed,
        world_text_visible: config.show_in_world_text && symbols_allowed,
        world_text: classification.raise.label(),
        caster_name_text: caster_text(
            config,
            classification.raise.shows_casters(),
            classification.raise_caster_text(),
        ),
        progress: classification.raise_progress.filter(|_| {
            config.show_cast_progress
                && config.rect_type.fills()
                && classification.raise.shows_casters()
        }),
    });

    let dispel = dispel.map(|color| Highlight {
        category: CastCategory::Dispel,
        label: classification.dispel.label(),
        color,
        background_color: config.in_world_background_color_dispel,
        frame_visible,
        icon_visible: config.show_icon_dispel && symbols_allowed,
        world_text_visible: config.show_in_world_text_dispel && symbols_allowed,
        world_text: classification.dispel.label(),
        caster_name_text: caster_text(
            config,
            classification.dispel.shows_casters(),
            classification.dispel_caster_text(),
        ),
        progress: None,
    });

    RenderDescription {
        actor: classification.actor,
        name: resolve(classification.name).to_string(),
        raise,
        dispel,
        rect_type: config.rect_type,
        icon_scale: config.clamped_icon_scale(),
    }
}

fn category_active(
    config: &HighlightConfig,
    category: CastCategory,
    capabilities: Capabilities,
) -> bool {
    let (enabled, restricted) = match category {
        CastCategory::Raise => (config.enabled_raise, config.restricted_jobs),
        CastCategory::Dispel => (config.enabled_dispel, config.restricted_jobs_dispel),
    };
    config.enabled && enabled && (!restricted || capabilities.allows(category))
}

fn raise_color(state: RaiseState, config: &HighlightConfig) -> Option<Color> {
    match state {
        RaiseState::None => None,
        RaiseState::BeingRaised => Some(config.currently_raising_color),
        RaiseState::RedundantRaise => Some(config.redundant_color),
        RaiseState::AlreadyRaised => Some(config.raised_color),
    }
}

fn dispel_color(state: DispelState, config: &HighlightConfig) -> Option<Color> {
    match state {
        DispelState::None => None,
        DispelState::Dispellable => Some(config.dispellable_color),
        DispelState::BeingDispelled => Some(config.currently_dispelling_color),
        DispelState::RedundantDispel => Some(config.redundant_color),
    }
}

fn caster_text(config: &HighlightConfig, shows_casters: bool, names: String) -> Option<String> {
    (config.show_caster_names && shows_casters && !names.is_empty()).then_some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{highlight_colors, intern};
    use crate::identity::IdentityResolver;
    use crate::observer::CharacterIdentity;

    fn target(group: GroupKind) -> TargetClassification {
        let mut resolver = IdentityResolver::new(10);
        let tick = resolver.resolve_tick(&[(
            1,
            Some(CharacterIdentity {
                token: 11,
                name: "Yda".to_string(),
            }),
        )]);
        TargetClassification::idle(tick.get(1).unwrap(), intern("Yda"), group)
    }

    fn being_raised(group: GroupKind) -> TargetClassification {
        let mut c = target(group);
        c.raise = RaiseState::BeingRaised;
        c.raise_casters = vec![intern("Xan"), intern("Zed")];
        c.raise_progress = Some(0.25);
        c
    }

    #[test]
    fn none_states_project_nothing() {
        let desc = project(
            &target(GroupKind::Party),
            &HighlightConfig::default(),
            Capabilities::default(),
        );
        assert!(desc.is_empty());
        assert_eq!(desc.frame_color(), None);
        assert_eq!(desc.name, "Yda");
    }

    #[test]
    fn being_raised_defaults() {
        let desc = project(
            &being_raised(GroupKind::Party),
            &HighlightConfig::default(),
            Capabilities::default(),
        );
        let raise = desc.raise.as_ref().unwrap();
        assert_eq!(raise.color, highlight_colors::CURRENTLY_RAISING);
        assert!(raise.frame_visible && raise.icon_visible && raise.world_text_visible);
        assert_eq!(raise.world_text, "Being Raised");
        assert_eq!(raise.caster_name_text.as_deref(), Some("Xan, Zed"));
        // Progress is off by default
        assert_eq!(raise.progress, None);
        assert!(desc.dispel.is_none());
        assert_eq!(desc.frame_color(), Some(highlight_colors::CURRENTLY_RAISING));
    }

    #[test]
    fn disabled_categories_and_job_gate() {
        let classification = being_raised(GroupKind::Party);
        let no_raise = Capabilities {
            raise: false,
            dispel: true,
        };

        let mut config = HighlightConfig::default();
        assert!(project(&classification, &config, no_raise).raise.is_some());

        config.restricted_jobs = true;
        assert!(project(&classification, &config, no_raise).raise.is_none());
        assert!(project(&classification, &config, Capabilities::default()).raise.is_some());

        config.restricted_jobs = false;
        config.enabled_raise = false;
        assert!(project(&classification, &config, no_raise).raise.is_none());

        config.enabled_raise = true;
        config.enabled = false;
        assert!(project(&classification, &config, no_raise).is_empty());
    }

    #[test]
    fn frame_toggles_follow_group() {
        let mut config = HighlightConfig::default();
        config.show_alliance_frame = false;
        let caps = Capabilities::default();

        let alliance = project(&being_raised(GroupKind::Alliance), &config, caps);
        assert!(!alliance.raise.unwrap().frame_visible);

        let other = project(&being_raised(GroupKind::Other), &config, caps);
        let raise = other.raise.unwrap();
        assert!(!raise.frame_visible);
        assert!(raise.world_text_visible);

        config.show_self = false;
        let me = project(&being_raised(GroupKind::LocalPlayer), &config, caps);
        assert!(!me.raise.unwrap().frame_visible);
    }

    #[test]
    fn hide_symbols_on_self_keeps_frame() {
        let mut config = HighlightConfig::default();
        config.hide_symbols_on_self = true;
        let desc = project(
            &being_raised(GroupKind::LocalPlayer),
            &config,
            Capabilities::default(),
        );
        let raise = desc.raise.unwrap();
        assert!(raise.frame_visible);
        assert!(!raise.icon_visible);
        assert!(!raise.world_text_visible);
    }

    #[test]
    fn cast_progress_only_for_filled_styles() {
        let mut config = HighlightConfig::default();
        config.show_cast_progress = true;
        let caps = Capabilities::default();

        let filled = project(&being_raised(GroupKind::Party), &config, caps);
        assert_eq!(filled.raise.unwrap().progress, Some(0.25));

        config.rect_type = RectType::OutlineOnly;
        let outline = project(&being_raised(GroupKind::Party), &config, caps);
        assert_eq!(outline.raise.unwrap().progress, None);
    }

    #[test]
    fn dispel_colors_and_caster_toggle() {
        let mut c = target(GroupKind::Party);
        c.dispel = DispelState::RedundantDispel;
        c.dispel_casters = vec![intern("Xan")];
        c.raise = RaiseState::AlreadyRaised;

        let mut config = HighlightConfig::default();
        config.show_caster_names = false;
        config.icon_scale = 9.0;
        let desc = project(&c, &config, Capabilities::default());

        let dispel = desc.dispel.as_ref().unwrap();
        assert_eq!(dispel.color, highlight_colors::REDUNDANT);
        assert_eq!(dispel.background_color, highlight_colors::IN_WORLD_BG_DISPEL);
        assert_eq!(dispel.caster_name_text, None);

        let raise = desc.raise.as_ref().unwrap();
        assert_eq!(raise.color, highlight_colors::ALREADY_RAISED);
        assert_eq!(raise.caster_name_text, None);

        assert_eq!(desc.icon_scale, 3.0);
        // Raise takes the frame when both are present
        assert_eq!(desc.frame_color(), Some(highlight_colors::ALREADY_RAISED));
    }
}
