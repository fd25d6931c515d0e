use vrdock_input::PrimaryAction;
use vrdock_testkit::{aim_at, connect_device, menu_dock, run_ticks, TickRunConfig};
use vrdock_ui3d::Dock;

#[test]
fn opening_a_second_menu_closes_the_first() {
    let mut rig = menu_dock().unwrap();
    let [first, second] = rig.menus;
    let device = connect_device(rig.surface.world_mut(), 0).unwrap();

    aim_at(rig.surface.world_mut(), device, first).unwrap();
    rig.surface.tick(0.0).unwrap();
    rig.surface
        .handle_action(device, PrimaryAction::SelectStart)
        .unwrap();
    rig.surface
        .handle_action(device, PrimaryAction::SelectEnd)
        .unwrap();

    // Let the dock finish lifting before re-aiming.
    let (mut rig, report) = run_ticks(
        TickRunConfig::new("lift", 20),
        rig,
        |_, dt, rig| {
            rig.surface.tick(dt)?;
            Ok(())
        },
        |_, rig| rig.surface.dock().y(),
    )
    .unwrap();
    let lifted = *report.last().unwrap();
    assert!((lifted - (Dock::OFFSET_Y + 0.15)).abs() < 1e-4, "y = {lifted}");

    aim_at(rig.surface.world_mut(), device, second).unwrap();
    rig.surface.tick(0.0).unwrap();
    rig.surface
        .handle_action(device, PrimaryAction::SelectStart)
        .unwrap();

    let dock = rig.surface.dock();
    assert!(!dock.menu(first).unwrap().is_open());
    assert!(!dock.button(first).unwrap().is_held());
    assert!(dock.menu(second).unwrap().is_open());
    assert!(dock.button(second).unwrap().is_held());
    // The closing panel stays drawn until it has collapsed.
    assert!(dock.menu(first).unwrap().is_visible());

    for _ in 0..20 {
        rig.surface.tick(1.0 / 72.0).unwrap();
    }
    let dock = rig.surface.dock();
    assert!(!dock.menu(first).unwrap().is_visible());
    assert!(dock.menu(second).unwrap().is_visible());
    assert!((dock.y() - (Dock::OFFSET_Y + 0.15)).abs() < 1e-4);
}

#[test]
fn plain_button_press_opens_nothing() {
    let mut rig = menu_dock().unwrap();
    let device = connect_device(rig.surface.world_mut(), 0).unwrap();
    aim_at(rig.surface.world_mut(), device, rig.plain).unwrap();
    rig.surface.tick(0.0).unwrap();

    let events = rig
        .surface
        .handle_action(device, PrimaryAction::SelectStart)
        .unwrap();
    assert_eq!(events.len(), 2);
    assert!(!rig.surface.dock().is_menu_open());
    assert!(rig.surface.dock().button(rig.plain).unwrap().is_active());
}
