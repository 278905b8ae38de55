use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::NextFocus => app.cycle_focus(true),
        InputAction::PrevFocus => app.cycle_focus(false),
        InputAction::MoveUp => app.move_cursor(0, -1),
        InputAction::MoveDown => app.move_cursor(0, 1),
        InputAction::MoveLeft => app.move_cursor(-1, 0),
        InputAction::MoveRight => app.move_cursor(1, 0),
        InputAction::Activate => app.activate_primary(),
        InputAction::EditSlot(position) => app.edit_slot(position),
        InputAction::CancelEdit => app.cancel_edit(),
        InputAction::Calculate => app.calculate(),
        InputAction::Reset => app.reset(),
    }
}
