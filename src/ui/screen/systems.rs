// src/ui/screen/systems.rs
//
// Systems for rebuilding screens and turning input into progression commands.

use bevy::{ecs::hierarchy::ChildSpawnerCommands, prelude::*};

use crate::core::config::{DialogueBoxSettings, ShellConfig};
use crate::dialogue::store::DialogueStore;
use crate::progression::{controller::ProgressionController, events::ProgressionCommand};

use super::components::{ChoiceAction, ChoiceButton, DialogueText, ScreenRoot, ScreenTracker};

// Visual constants
const SCREEN_BACKGROUND: Color = Color::srgb(0.06, 0.06, 0.09);
const BOX_BACKGROUND: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
const BOX_BORDER: Color = Color::srgb(0.3, 0.3, 0.3);
const BUTTON_IDLE: Color = Color::srgba(0.18, 0.18, 0.22, 0.95);
const BUTTON_HOVERED: Color = Color::srgba(0.28, 0.28, 0.34, 0.95);
const BUTTON_PRESSED: Color = Color::srgba(0.38, 0.32, 0.14, 0.95);
const BUTTON_BORDER: Color = Color::srgb(0.4, 0.4, 0.45);
const TEXT_COLOR: Color = Color::WHITE;

const CONTINUE_LABEL: &str = "Continue";
const BACK_TO_MENU_LABEL: &str = "Back to the Menu";
const EXIT_LABEL: &str = "Exit";

/// Despawn the current screen and build the one matching controller state.
///
/// Runs only when the controller resource changed.
pub fn refresh_screen(
    mut commands: Commands,
    mut tracker: ResMut<ScreenTracker>,
    controller: Res<ProgressionController>,
    store: Res<DialogueStore>,
    config: Res<ShellConfig>,
) {
    if let Some(old_root) = tracker.root.take() {
        commands.entity(old_root).despawn();
    }

    let root = commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(SCREEN_BACKGROUND),
            ScreenRoot,
            Name::new("Screen Root"),
        ))
        .id();

    if controller.is_in_menu() {
        debug!("Building menu with {} scenes", store.len());
        commands
            .entity(root)
            .with_children(|parent| spawn_menu(parent, &store, &config));
    } else if let Some(scene) = controller.active_scene() {
        let index = controller.current_index();
        let line = store
            .line_at(scene, index)
            .unwrap_or_else(|err| {
                error!("Cannot show line: {}", err);
                ""
            })
            .to_string();
        debug!(
            "Showing {} line {}/{}",
            scene.name(),
            index + 1,
            store.line_count(scene)
        );
        let ended = controller.is_ended();
        commands.entity(root).with_children(|parent| {
            spawn_dialogue_box(parent, &line, ended, &config.dialogue_box);
        });
    }

    tracker.root = Some(root);
}

fn spawn_menu(parent: &mut ChildSpawnerCommands, store: &DialogueStore, config: &ShellConfig) {
    let menu = &config.menu;
    parent
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                width: Val::Px(menu.panel_width),
                margin: UiRect::all(Val::Px(menu.margin)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            Name::new("Main Menu"),
        ))
        .with_children(|panel| {
            for scene in store.scenes() {
                spawn_choice_button(
                    panel,
                    scene.menu_label(),
                    ChoiceAction::StartScene(scene.name().to_string()),
                    menu.font_size,
                    menu.button_height,
                    menu.margin,
                );
            }
            spawn_choice_button(
                panel,
                EXIT_LABEL,
                ChoiceAction::Exit,
                menu.font_size,
                menu.button_height,
                menu.margin,
            );
        });
}

fn spawn_dialogue_box(
    parent: &mut ChildSpawnerCommands,
    line: &str,
    ended: bool,
    settings: &DialogueBoxSettings,
) {
    parent
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(20.0),
                left: Val::Px(20.0),
                right: Val::Px(20.0),
                min_height: Val::Px(settings.height),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(settings.padding),
                ..default()
            },
            BackgroundColor(BOX_BACKGROUND),
            BorderColor::from(BOX_BORDER),
            Name::new("Dialogue Box"),
        ))
        .with_children(|dialogue_box| {
            dialogue_box.spawn((
                Text::new(line),
                TextFont {
                    font_size: settings.text_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                DialogueText,
            ));

            if !ended {
                return;
            }

            // End-of-scene choices sit in a row under the final line.
            dialogue_box
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(settings.padding),
                    ..default()
                })
                .with_children(|choices| {
                    let height = settings.choice_font_size * 3.0;
                    spawn_choice_button(
                        choices,
                        CONTINUE_LABEL,
                        ChoiceAction::Continue,
                        settings.choice_font_size,
                        height,
                        0.0,
                    );
                    spawn_choice_button(
                        choices,
                        BACK_TO_MENU_LABEL,
                        ChoiceAction::BackToMenu,
                        settings.choice_font_size,
                        height,
                        0.0,
                    );
                });
        });
}

fn spawn_choice_button(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    action: ChoiceAction,
    font_size: f32,
    height: f32,
    margin: f32,
) {
    parent
        .spawn((
            Node {
                height: Val::Px(height),
                margin: UiRect::all(Val::Px(margin)),
                padding: UiRect::horizontal(Val::Px(12.0)),
                border: UiRect::all(Val::Px(1.5)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Button,
            Interaction::None,
            BackgroundColor(BUTTON_IDLE),
            BorderColor::from(BUTTON_BORDER),
            ChoiceButton::new(action),
            Name::new(format!("Choice Button: {}", label)),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
        });
}

/// Turn pressed choice buttons into progression commands, or exit the app.
pub fn handle_choice_buttons(
    buttons: Query<(&Interaction, &ChoiceButton), (Changed<Interaction>, With<Button>)>,
    mut requests: MessageWriter<ProgressionCommand>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, button) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }

        match button.action.command() {
            Some(command) => {
                debug!("Choice {:?} pressed", button.action);
                requests.write(command);
            }
            None => {
                info!("Exit selected from the menu");
                exit.write(AppExit::Success);
            }
        }
    }
}

/// Forward clicks and advance keys to the controller while a line is showing.
///
/// Input is dropped in the menu, once the scene has ended, and while the
/// pointer is over a button so a button press never doubles as an advance.
pub fn forward_advance_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<ShellConfig>,
    controller: Res<ProgressionController>,
    buttons: Query<&Interaction, With<Button>>,
    mut requests: MessageWriter<ProgressionCommand>,
) {
    if controller.is_in_menu() || controller.is_ended() {
        return;
    }

    let clicked = mouse.just_pressed(MouseButton::Left)
        && buttons
            .iter()
            .all(|interaction| *interaction == Interaction::None);
    let key_pressed = config.input.advance_keys_enabled
        && keyboard.any_just_pressed([KeyCode::Space, KeyCode::Enter]);

    if clicked || key_pressed {
        requests.write(ProgressionCommand::Advance);
    }
}

/// Escape leaves a scene for the menu at any point, when enabled.
pub fn handle_quit_to_menu_hotkey(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<ShellConfig>,
    controller: Res<ProgressionController>,
    mut requests: MessageWriter<ProgressionCommand>,
) {
    if !config.input.quit_to_menu_hotkey || controller.is_in_menu() {
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        info!("Quit-to-menu hotkey pressed");
        requests.write(ProgressionCommand::ReturnToMenu);
    }
}

/// Tint buttons to reflect hover and press state.
pub fn style_choice_buttons(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<ChoiceButton>),
    >,
) {
    for (interaction, mut background) in buttons.iter_mut() {
        background.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::catalog::{DEMO, INTRODUCTION};
    use crate::progression::{
        events::{ProgressionChanged, ProgressionCommandFailed},
        systems::apply_progression_commands,
    };

    fn build_app() -> App {
        let mut app = App::new();
        app.add_message::<ProgressionCommand>()
            .add_message::<ProgressionChanged>()
            .add_message::<ProgressionCommandFailed>()
            .add_message::<AppExit>()
            .insert_resource(ShellConfig::default())
            .insert_resource(DialogueStore::builtin())
            .insert_resource(ProgressionController::new())
            .init_resource::<ScreenTracker>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_systems(
                Update,
                (
                    (
                        handle_choice_buttons,
                        forward_advance_input,
                        handle_quit_to_menu_hotkey,
                    ),
                    apply_progression_commands,
                    refresh_screen.run_if(resource_changed::<ProgressionController>),
                )
                    .chain(),
            );
        app
    }

    fn start_scene(app: &mut App, name: &str) {
        let store = app.world().resource::<DialogueStore>().clone();
        let scene = store.get_scene(name).expect("scene exists");
        app.world_mut()
            .resource_mut::<ProgressionController>()
            .start_scene(scene)
            .expect("scene starts");
    }

    fn choice_actions(app: &mut App) -> Vec<ChoiceAction> {
        let world = app.world_mut();
        world
            .query::<&ChoiceButton>()
            .iter(world)
            .map(|button| button.action.clone())
            .collect()
    }

    fn dialogue_text(app: &mut App) -> Option<String> {
        let world = app.world_mut();
        world
            .query_filtered::<&Text, With<DialogueText>>()
            .iter(world)
            .next()
            .map(|text| text.0.clone())
    }

    fn press_choice(app: &mut App, action: ChoiceAction) {
        let button = {
            let world = app.world_mut();
            world
                .query::<(Entity, &ChoiceButton)>()
                .iter(world)
                .find(|(_, button)| button.action == action)
                .map(|(entity, _)| entity)
                .expect("choice button exists")
        };
        app.world_mut()
            .entity_mut(button)
            .insert(Interaction::Pressed);
    }

    fn screen_root(app: &App) -> Option<Entity> {
        app.world().resource::<ScreenTracker>().root
    }

    /// Runs Demo to its end-of-scene choices with the click released.
    fn end_demo(app: &mut App) {
        start_scene(app, DEMO);
        app.update();

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .reset_all();

        assert!(app.world().resource::<ProgressionController>().is_ended());
    }

    fn press_key(app: &mut App, key: KeyCode) {
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.clear();
        keyboard.press(key);
    }

    #[test]
    fn menu_lists_every_scene_and_exit() {
        let mut app = build_app();
        app.update();

        let actions = choice_actions(&mut app);
        assert_eq!(actions.len(), 3);
        assert!(actions.contains(&ChoiceAction::StartScene(DEMO.to_string())));
        assert!(actions.contains(&ChoiceAction::StartScene(INTRODUCTION.to_string())));
        assert!(actions.contains(&ChoiceAction::Exit));
        assert_eq!(dialogue_text(&mut app), None);
    }

    #[test]
    fn pressing_a_scene_button_shows_its_first_line() {
        let mut app = build_app();
        app.update();

        let demo_button = {
            let world = app.world_mut();
            world
                .query::<(Entity, &ChoiceButton)>()
                .iter(world)
                .find(|(_, button)| button.action == ChoiceAction::StartScene(DEMO.to_string()))
                .map(|(entity, _)| entity)
                .expect("demo button exists")
        };
        app.world_mut()
            .entity_mut(demo_button)
            .insert(Interaction::Pressed);
        app.update();

        let controller = app.world().resource::<ProgressionController>();
        assert!(!controller.is_in_menu());
        assert_eq!(
            dialogue_text(&mut app).as_deref(),
            Some("Demo in production. Be patient!")
        );
        assert!(choice_actions(&mut app).is_empty());
    }

    #[test]
    fn clicking_advances_and_end_shows_choices() {
        let mut app = build_app();
        start_scene(&mut app, DEMO);
        app.update();

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();

        let controller = app.world().resource::<ProgressionController>();
        assert!(controller.is_ended());

        let actions = choice_actions(&mut app);
        assert_eq!(actions.len(), 2);
        assert!(actions.contains(&ChoiceAction::Continue));
        assert!(actions.contains(&ChoiceAction::BackToMenu));
        assert_eq!(
            dialogue_text(&mut app).as_deref(),
            Some("Demo in production. Be patient!")
        );
    }

    #[test]
    fn advance_key_moves_to_next_line() {
        let mut app = build_app();
        start_scene(&mut app, INTRODUCTION);
        app.update();

        press_key(&mut app, KeyCode::Space);
        app.update();

        assert_eq!(
            app.world().resource::<ProgressionController>().current_index(),
            1
        );
        assert_eq!(
            dialogue_text(&mut app).as_deref(),
            Some("This is a simple Visual Novel engine built with Rust and Bevy.")
        );
    }

    #[test]
    fn clicks_in_menu_do_not_advance() {
        let mut app = build_app();
        app.update();

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        press_key(&mut app, KeyCode::Enter);
        app.update();

        let controller = app.world().resource::<ProgressionController>();
        assert!(controller.is_in_menu());
        assert_eq!(controller.current_index(), 0);
    }

    #[test]
    fn escape_returns_to_menu_mid_scene() {
        let mut app = build_app();
        start_scene(&mut app, INTRODUCTION);
        app.update();

        press_key(&mut app, KeyCode::Escape);
        app.update();

        let controller = app.world().resource::<ProgressionController>();
        assert!(controller.is_in_menu());
        assert_eq!(choice_actions(&mut app).len(), 3);
    }

    #[test]
    fn escape_is_ignored_when_hotkey_disabled() {
        let mut app = build_app();
        app.world_mut()
            .resource_mut::<ShellConfig>()
            .input
            .quit_to_menu_hotkey = false;
        start_scene(&mut app, INTRODUCTION);
        app.update();

        press_key(&mut app, KeyCode::Escape);
        app.update();

        assert!(!app.world().resource::<ProgressionController>().is_in_menu());
    }

    #[test]
    fn ignored_advance_keeps_the_current_screen() {
        let mut app = build_app();
        end_demo(&mut app);
        let root = screen_root(&app).expect("screen built");

        app.world_mut().write_message(ProgressionCommand::Advance);
        app.update();

        assert_eq!(screen_root(&app), Some(root));
        assert!(app.world().get_entity(root).is_ok());
        let world = app.world_mut();
        let roots = world
            .query_filtered::<Entity, With<ScreenRoot>>()
            .iter(world)
            .count();
        assert_eq!(roots, 1);
        assert_eq!(choice_actions(&mut app).len(), 2);
    }

    #[test]
    fn applied_command_rebuilds_the_screen() {
        let mut app = build_app();
        end_demo(&mut app);
        let root = screen_root(&app).expect("screen built");

        app.world_mut().write_message(ProgressionCommand::Restart);
        app.update();

        let rebuilt = screen_root(&app).expect("screen rebuilt");
        assert_ne!(rebuilt, root);
        assert!(app.world().get_entity(root).is_err());
    }

    #[test]
    fn continue_button_restarts_the_scene() {
        let mut app = build_app();
        end_demo(&mut app);

        press_choice(&mut app, ChoiceAction::Continue);
        app.update();

        let controller = app.world().resource::<ProgressionController>();
        assert!(!controller.is_in_menu());
        assert_eq!(controller.current_index(), 0);
        assert!(!controller.is_ended());
        assert_eq!(
            dialogue_text(&mut app).as_deref(),
            Some("Demo in production. Be patient!")
        );
        assert!(choice_actions(&mut app).is_empty());
    }

    #[test]
    fn back_to_menu_button_rebuilds_the_menu() {
        let mut app = build_app();
        end_demo(&mut app);

        press_choice(&mut app, ChoiceAction::BackToMenu);
        app.update();

        assert!(app.world().resource::<ProgressionController>().is_in_menu());
        let actions = choice_actions(&mut app);
        assert_eq!(actions.len(), 3);
        assert!(actions.contains(&ChoiceAction::Exit));
        assert_eq!(dialogue_text(&mut app), None);
    }
}
