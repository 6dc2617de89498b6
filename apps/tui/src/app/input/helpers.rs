use crossterm::event::KeyCode;

const PAGE_JUMP: usize = 5;

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Table navigation: arrows, PgUp/PgDn by five rows, Home/End. Never wraps.
pub const fn move_selection(index: usize, total_rows: usize, key: KeyCode) -> usize {
    if total_rows == 0 {
        return 0;
    }

    let last = total_rows - 1;
    let next = match key {
        KeyCode::Up => index.saturating_sub(1),
        KeyCode::Down => index + 1,
        KeyCode::PageUp => index.saturating_sub(PAGE_JUMP),
        KeyCode::PageDown => index + PAGE_JUMP,
        KeyCode::Home => 0,
        KeyCode::End => last,
        _ => index,
    };

    if next > last {
        last
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_moves() {
        assert_eq!(wrap_decrement(0, 4), 3);
        assert_eq!(wrap_increment(3, 4), 0);
        assert_eq!(wrap_increment(0, 0), 0);
    }

    #[test]
    fn selection_is_clamped() {
        assert_eq!(move_selection(0, 3, KeyCode::Up), 0);
        assert_eq!(move_selection(2, 3, KeyCode::Down), 2);
        assert_eq!(move_selection(1, 10, KeyCode::PageDown), 6);
        assert_eq!(move_selection(8, 10, KeyCode::PageDown), 9);
        assert_eq!(move_selection(4, 10, KeyCode::End), 9);
        assert_eq!(move_selection(4, 0, KeyCode::Down), 0);
    }
}
