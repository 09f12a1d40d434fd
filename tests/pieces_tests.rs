//! Pieces tests - shape table, bitmaps and rotation without kicks

use brickgame::core::tetris::{bitmap, get_shape, PieceKind, Rotation, Tetromino, SPAWN_POSITION};
use brickgame::types::PREVIEW_SIZE;

#[test]
fn test_all_kinds_have_distinct_codes() {
    let mut codes: Vec<u8> = PieceKind::ALL.iter().map(|k| k.code()).collect();
    codes.sort_unstable();
    assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_o_piece_never_changes_shape() {
    let north = get_shape(PieceKind::O, Rotation::North);
    for rotation in Rotation::ALL {
        assert_eq!(get_shape(PieceKind::O, rotation), north);
    }
}

#[test]
fn test_i_piece_shapes() {
    assert_eq!(
        get_shape(PieceKind::I, Rotation::North),
        [(0, 1), (1, 1), (2, 1), (3, 1)]
    );
    assert_eq!(
        get_shape(PieceKind::I, Rotation::East),
        [(2, 0), (2, 1), (2, 2), (2, 3)]
    );
}

#[test]
fn test_four_rotations_return_to_start() {
    for kind in PieceKind::ALL {
        let piece = Tetromino::new(kind, Rotation::North);
        let mut turned = piece;
        for _ in 0..4 {
            turned = turned.rotated(true);
        }
        assert_eq!(turned, piece);
        assert_eq!(piece.rotated(true).rotated(false), piece);
    }
}

#[test]
fn test_rotation_keeps_origin() {
    let piece = Tetromino::new(PieceKind::T, Rotation::North).shifted(2, 7);
    let turned = piece.rotated(true);
    assert_eq!((turned.x, turned.y), (piece.x, piece.y));
    assert_eq!(turned.rotation, Rotation::East);
}

#[test]
fn test_bitmap_matches_shape() {
    for kind in PieceKind::ALL {
        for rotation in Rotation::ALL {
            let map = bitmap(kind, rotation);
            for (x, y) in get_shape(kind, rotation) {
                assert_eq!(map[y as usize][x as usize], kind.code());
            }
            let filled = map
                .iter()
                .flat_map(|row| row.iter())
                .filter(|&&c| c != 0)
                .count();
            assert_eq!(filled, 4);
            assert_eq!(map.len(), PREVIEW_SIZE);
        }
    }
}

#[test]
fn test_spawn_position() {
    let piece = Tetromino::new(PieceKind::L, Rotation::West);
    assert_eq!((piece.x, piece.y), SPAWN_POSITION);
    assert_eq!(SPAWN_POSITION, (3, 0));
}
