//! End to end scenarios driven through the recording mock connection.
use pretty_assertions::assert_eq;
use stupidwm::{
    bindings::{keysym::*, modmask::*},
    pure::geometry::Rect,
    x::{
        event::{ConfigureRequest, ExposeEvent, XEvent},
        mock::Recorded,
    },
    Config, Error, Xid,
};

mod common;
use common::{key, new_wm, new_wm_with_screens, SCREEN};

fn map(id: u32) -> XEvent {
    XEvent::MapRequest(Xid(id))
}

#[test]
fn with_no_outputs_a_synthetic_root_monitor_is_used() {
    let (wm, _) = new_wm_with_screens(vec![], vec![]);

    assert_eq!(wm.state().monitors().len(), 1);
    assert_eq!(wm.state().selected_monitor().r, Rect::new(0, 0, 1920, 1080));
    assert!(wm.state().selected_monitor().primary);
}

#[test]
fn an_empty_workspace_issues_no_geometry_or_focus_calls() {
    let mut wm = new_wm(vec![]);

    // switching away from an empty workspace has nothing to map, unmap,
    // position or focus: only the bar is repainted
    wm.handle_xevent(key(MOD4, XK_1 + 1)).unwrap();

    let calls = wm.conn().take_calls();
    assert!(calls.iter().all(|c| matches!(
        c,
        Recorded::FillRect(..) | Recorded::DrawText(..)
    )));
}

#[test]
fn a_single_client_gets_the_whole_monitor() {
    let config = Config::default();
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();

    assert_eq!(
        wm.conn().take_calls(),
        vec![
            Recorded::WatchEnter(Xid(1)),
            Recorded::Map(Xid(1)),
            Recorded::Position(Xid(1), Rect::new(10, 30, 1890, 1030)),
            Recorded::BorderWidth(Xid(1), 5),
            Recorded::BorderColor(Xid(1), config.focused),
            Recorded::Raise(Xid(1)),
            Recorded::Focus(Xid(1)),
        ]
    );
}

#[test]
fn a_second_client_splits_master_and_stack() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.conn().take_calls();
    wm.handle_xevent(map(2)).unwrap();

    let calls = wm.conn().take_calls();
    let positions: Vec<_> = calls
        .iter()
        .filter(|c| matches!(c, Recorded::Position(..)))
        .cloned()
        .collect();

    assert_eq!(
        positions,
        vec![
            Recorded::Position(Xid(1), Rect::new(10, 30, 1056, 1040)),
            Recorded::Position(Xid(2), Rect::new(1086, 30, 814, 1060)),
        ]
    );
    assert_eq!(
        wm.state().current_workspace().focused_client(),
        Some(Xid(2))
    );
}

#[test]
fn an_already_managed_client_is_just_remapped() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.conn().take_calls();
    wm.handle_xevent(map(1)).unwrap();

    assert_eq!(wm.conn().take_calls(), vec![Recorded::Map(Xid(1))]);
    assert_eq!(wm.state().current_workspace().len(), 1);
}

#[test]
fn moving_a_client_to_another_workspace_empties_the_current_one() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.conn().take_calls();

    // Super+Shift+2: send the focused client to the second workspace
    wm.handle_xevent(key(MOD4 | SHIFT, XK_1 + 1)).unwrap();

    assert_eq!(wm.state().workspace(1).clients(), &[Xid(1)]);
    assert_eq!(wm.state().workspace(1).focused_client(), Some(Xid(1)));
    assert!(wm.state().workspace(0).is_empty());

    let calls = wm.conn().take_calls();
    assert!(calls.contains(&Recorded::Unmap(Xid(1))));

    // Super+1 is the current workspace: nothing is mapped
    wm.handle_xevent(key(MOD4, XK_1)).unwrap();
    assert!(!wm
        .conn()
        .take_calls()
        .iter()
        .any(|c| matches!(c, Recorded::Map(_))));
}

#[test]
fn switching_workspaces_swaps_the_visible_window_set() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.handle_xevent(map(2)).unwrap();
    wm.conn().take_calls();

    // away: both clients are hidden
    wm.handle_xevent(key(MOD4, XK_1 + 3)).unwrap();
    let calls = wm.conn().take_calls();
    assert!(calls.contains(&Recorded::Unmap(Xid(1))));
    assert!(calls.contains(&Recorded::Unmap(Xid(2))));
    assert!(!calls.iter().any(|c| matches!(c, Recorded::Map(_))));
    assert!(wm.state().current_workspace().is_empty());

    // and back: both clients are shown again, list and focus untouched
    wm.handle_xevent(key(MOD4, XK_1)).unwrap();
    let calls = wm.conn().take_calls();
    assert!(calls.contains(&Recorded::Map(Xid(1))));
    assert!(calls.contains(&Recorded::Map(Xid(2))));
    assert_eq!(wm.state().current_workspace().clients(), &[Xid(1), Xid(2)]);
    assert_eq!(
        wm.state().current_workspace().focused_client(),
        Some(Xid(2))
    );
}

#[test]
fn destroy_of_an_unmanaged_window_is_ignored() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.conn().take_calls();

    wm.handle_xevent(XEvent::Destroy(Xid(99))).unwrap();

    assert_eq!(wm.conn().take_calls(), vec![]);
    assert_eq!(wm.state().current_workspace().clients(), &[Xid(1)]);
}

#[test]
fn destroy_retiles_and_refocuses_the_survivors() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.handle_xevent(map(2)).unwrap();
    wm.conn().take_calls();

    wm.handle_xevent(XEvent::Destroy(Xid(2))).unwrap();

    assert_eq!(wm.state().current_workspace().clients(), &[Xid(1)]);
    assert_eq!(
        wm.state().current_workspace().focused_client(),
        Some(Xid(1))
    );

    let calls = wm.conn().take_calls();
    assert!(calls.contains(&Recorded::Position(Xid(1), Rect::new(10, 30, 1890, 1030))));
    assert!(calls.contains(&Recorded::Focus(Xid(1))));
}

#[test]
fn enter_moves_focus_to_the_entered_client() {
    let config = Config::default();
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.handle_xevent(map(2)).unwrap();
    wm.conn().take_calls();

    wm.handle_xevent(XEvent::Enter(Xid(1))).unwrap();

    assert_eq!(
        wm.state().current_workspace().focused_client(),
        Some(Xid(1))
    );
    let calls = wm.conn().take_calls();
    assert!(calls.contains(&Recorded::BorderColor(Xid(1), config.focused)));
    assert!(calls.contains(&Recorded::BorderColor(Xid(2), config.unfocused)));
}

#[test]
fn enter_on_the_root_or_an_unmanaged_window_is_ignored() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.handle_xevent(map(2)).unwrap();
    wm.conn().take_calls();

    wm.handle_xevent(XEvent::Enter(Xid(0))).unwrap(); // root
    wm.handle_xevent(XEvent::Enter(Xid(42))).unwrap(); // never mapped

    assert_eq!(wm.conn().take_calls(), vec![]);
    assert_eq!(
        wm.state().current_workspace().focused_client(),
        Some(Xid(2))
    );
}

#[test]
fn configure_requests_are_honored_verbatim() {
    let mut wm = new_wm(vec![]);

    // even for windows we do not manage
    wm.handle_xevent(XEvent::ConfigureRequest(ConfigureRequest {
        id: Xid(77),
        x: 5,
        y: 5,
        w: 300,
        h: 200,
        border_px: 1,
        sibling: Xid(0),
        stack_mode: 0,
        mask: 0xf,
    }))
    .unwrap();

    assert_eq!(wm.conn().take_calls(), vec![Recorded::Configure(Xid(77))]);
}

#[test]
fn expose_repaints_only_the_matching_bar() {
    let (mut wm, _) = new_wm_with_screens(
        vec![SCREEN, Rect::new(1920, 0, 1280, 1024)],
        vec![],
    );

    let second_bar = wm.state().monitors()[1].bar;
    wm.handle_xevent(XEvent::Expose(ExposeEvent {
        id: second_bar,
        count: 0,
    }))
    .unwrap();

    let calls = wm.conn().take_calls();
    assert!(!calls.is_empty());
    assert!(calls.iter().all(|c| matches!(
        c,
        Recorded::FillRect(id, ..) | Recorded::DrawText(id, ..) if *id == second_bar
    )));

    // non-final expose events are skipped
    wm.handle_xevent(XEvent::Expose(ExposeEvent {
        id: second_bar,
        count: 3,
    }))
    .unwrap();
    assert_eq!(wm.conn().take_calls(), vec![]);
}

#[test]
fn focus_movement_walks_master_and_stack() {
    let mut wm = new_wm(vec![]);

    for id in 1..=3 {
        wm.handle_xevent(map(id)).unwrap();
    }
    wm.conn().take_calls();

    let focused = |wm: &stupidwm::WindowManager<_>| {
        wm.state().current_workspace().focused_client().unwrap()
    };

    wm.handle_xevent(key(MOD4, XK_h)).unwrap();
    assert_eq!(focused(&wm), Xid(1), "h focuses the master");

    wm.handle_xevent(key(MOD4, XK_l)).unwrap();
    assert_eq!(focused(&wm), Xid(2), "l moves into the stack");

    wm.handle_xevent(key(MOD4, XK_j)).unwrap();
    assert_eq!(focused(&wm), Xid(3), "j moves down");

    wm.handle_xevent(key(MOD4, XK_k)).unwrap();
    assert_eq!(focused(&wm), Xid(2), "k moves up");
}

#[test]
fn swap_master_exchanges_window_ids_and_retiles() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.handle_xevent(map(2)).unwrap();
    wm.handle_xevent(map(3)).unwrap();
    wm.conn().take_calls();

    wm.handle_xevent(key(MOD4, XK_Return)).unwrap();

    assert_eq!(
        wm.state().current_workspace().clients(),
        &[Xid(3), Xid(2), Xid(1)]
    );
    assert_eq!(
        wm.state().current_workspace().focused_client(),
        Some(Xid(3))
    );
    assert!(wm
        .conn()
        .take_calls()
        .iter()
        .any(|c| matches!(c, Recorded::Position(..))));
}

#[test]
fn kill_sends_wm_delete_twice_to_the_focused_client() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(map(1)).unwrap();
    wm.conn().take_calls();

    wm.handle_xevent(key(MOD4 | SHIFT, XK_q)).unwrap();

    assert_eq!(
        wm.conn().take_calls(),
        vec![
            Recorded::SendWmDelete(Xid(1)),
            Recorded::SendWmDelete(Xid(1)),
        ]
    );
}

#[test]
fn kill_with_no_focused_client_is_a_noop() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(key(MOD4 | SHIFT, XK_q)).unwrap();

    assert_eq!(wm.conn().take_calls(), vec![]);
}

#[test]
fn spawn_bindings_go_through_the_spawner() {
    let (mut wm, spawned) = new_wm_with_screens(vec![SCREEN], vec![]);

    wm.handle_xevent(key(MOD4 | SHIFT, XK_Return)).unwrap();
    wm.handle_xevent(key(MOD4 | SHIFT, XK_p)).unwrap();

    assert_eq!(
        *spawned.borrow(),
        vec![vec!["kitty".to_string()], vec!["dmenu_run".to_string()]]
    );
}

#[test]
fn unknown_key_chords_are_ignored() {
    let mut wm = new_wm(vec![]);

    wm.handle_xevent(key(MOD4 | CONTROL, XK_q)).unwrap();
    wm.handle_xevent(key(0, XK_j)).unwrap();

    assert_eq!(wm.conn().take_calls(), vec![]);
}

#[test]
fn focusing_the_next_monitor_moves_the_selection() {
    let second = Rect::new(1920, 0, 1280, 1024);
    let (mut wm, _) = new_wm_with_screens(vec![SCREEN, second], vec![]);

    wm.handle_xevent(key(MOD4, XK_period)).unwrap();
    assert_eq!(wm.state().selected_monitor().r, second);

    // the selection does not wrap off the end
    wm.handle_xevent(key(MOD4, XK_period)).unwrap();
    assert_eq!(wm.state().selected_monitor().r, second);
}

#[test]
fn quit_drains_managed_windows_then_stops() {
    let mut wm = new_wm(vec![
        map(1),
        map(2),
        key(MOD4 | SHIFT, XK_e),
        XEvent::Destroy(Xid(1)),
        XEvent::Destroy(Xid(2)),
    ]);

    wm.run().unwrap();

    let calls = wm.conn().calls();
    assert!(calls.contains(&Recorded::SendWmDelete(Xid(1))));
    assert!(calls.contains(&Recorded::SendWmDelete(Xid(2))));
    assert_eq!(calls.last(), Some(&Recorded::UngrabKeys));
}

#[test]
fn a_second_quit_during_the_drain_forces_shutdown() {
    let mut wm = new_wm(vec![
        map(1),
        key(MOD4 | SHIFT, XK_e),
        // the client never dies; the user presses the chord again
        key(MOD4 | SHIFT, XK_e),
    ]);

    assert!(matches!(wm.run(), Err(Error::Shutdown)));
    assert!(wm.conn().calls().contains(&Recorded::UngrabKeys));
}
