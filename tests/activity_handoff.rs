use vrdock_input::{EventKind, InteractionEvent, PrimaryAction};
use vrdock_testkit::{aim_at, aim_away, connect_device, menu_dock};

#[test]
fn select_from_idle_controller_only_hands_off_activity() {
    let mut rig = menu_dock().unwrap();
    let surface = &mut rig.surface;
    let a = connect_device(surface.world_mut(), 0).unwrap();
    let b = connect_device(surface.world_mut(), 1).unwrap();
    assert_eq!(surface.world().active_device(), Some(b));

    aim_at(surface.world_mut(), a, rig.menus[0]).unwrap();
    aim_away(surface.world_mut(), b).unwrap();

    // Inactive controllers neither hover nor press.
    assert!(surface.tick(0.0).unwrap().is_empty());
    assert!(surface
        .handle_action(a, PrimaryAction::SelectStart)
        .unwrap()
        .is_empty());
    assert!(!surface.dock().is_menu_open());

    // A full select transfers activity and is swallowed.
    assert!(surface.handle_action(a, PrimaryAction::Select).unwrap().is_empty());
    assert_eq!(surface.world().active_device(), Some(a));
    assert!(surface.world().device(a).unwrap().laser().visible);
    assert!(!surface.world().device(b).unwrap().laser().visible);
    assert!(!surface.dock().is_menu_open());

    assert_eq!(
        surface.tick(0.0).unwrap(),
        vec![InteractionEvent::new(EventKind::PointerEnter, rig.menus[0], a)]
    );

    let events = surface.handle_action(a, PrimaryAction::SelectStart).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], InteractionEvent::new(EventKind::SelectStart, rig.menus[0], a));
    assert!(surface.dock().menu(rig.menus[0]).unwrap().is_open());

    // Handing back to b leaves the open menu alone.
    assert!(surface.handle_action(b, PrimaryAction::Select).unwrap().is_empty());
    assert_eq!(surface.world().active_device(), Some(b));
    assert!(surface.dock().menu(rig.menus[0]).unwrap().is_open());
}

#[test]
fn disconnected_controller_cannot_take_activity() {
    let mut rig = menu_dock().unwrap();
    let surface = &mut rig.surface;
    let a = connect_device(surface.world_mut(), 0).unwrap();
    let b = connect_device(surface.world_mut(), 1).unwrap();
    surface.world_mut().disconnect(a).unwrap();

    assert!(surface.handle_action(a, PrimaryAction::Select).unwrap().is_empty());
    assert_eq!(surface.world().active_device(), Some(b));
}
