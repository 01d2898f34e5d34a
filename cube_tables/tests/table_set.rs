use cube_tables::puzzle_cube3::coords::{CPerm, EPerm, Flip, MPerm, Slice, Twist};
use cube_tables::puzzle_cube3::utils::{N_MOVES, N_MOVES2, P2_MOVES};
use cube_tables::puzzle_cube3::{Coord, CubieCube};
use cube_tables::{BuildConf, TableSet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn tables() -> &'static TableSet {
    TableSet::global().unwrap()
}

/// Returns the cube after `len` random moves chosen from `moves`.
fn random_walk(rng: &mut ChaCha8Rng, moves: &[u8], len: usize) -> (CubieCube, Vec<u8>) {
    let walk: Vec<u8> = (0..len).map(|_| rng.gen_range(0..moves.len()) as u8).collect();
    let cube = walk.iter().fold(CubieCube::SOLVED, |c, &m| c.apply_move(moves[m as usize]));
    (cube, walk)
}

#[test_log::test]
fn global_is_shared() {
    let a = tables();
    let b = TableSet::global().unwrap();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a.conf, BuildConf::default());
    assert_eq!(a.pruning_tables().count(), 5);
    assert!(a.size_bytes() > a.coords.size_bytes());
}

#[test_log::test]
fn solved_bounds_are_zero() {
    let t = tables();
    assert_eq!(t.phase1_bound(0, 0, 0), 0);
    assert_eq!(t.phase2_bound(0, 0, 0), 0);
    assert_eq!(t.twist_flip_bound(0, 0), Some(0));
    for m in 0..N_MOVES as u8 {
        let c = CubieCube::SOLVED.apply_move(m);
        let bound = t.phase1_bound(Twist::get(&c), Flip::get(&c), Slice::get(&c));
        // U, D and the half turns of the side faces keep the cube in phase 2.
        assert_eq!(bound == 0, m % 9 < 3 || m % 3 == 1, "move {}", m);
    }
    for &m in P2_MOVES.iter() {
        let c = CubieCube::SOLVED.apply_move(m);
        assert_eq!(t.phase2_bound(CPerm::get(&c), EPerm::get(&c), MPerm::get(&c)), 1);
    }
}

#[test_log::test]
fn bounds_do_not_exceed_walk_length() {
    let t = tables();
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    for len in 0..14 {
        for _ in 0..40 {
            let (c, _) = random_walk(&mut rng, &(0..N_MOVES as u8).collect::<Vec<_>>(), len);
            assert!(t.phase1_bound(Twist::get(&c), Flip::get(&c), Slice::get(&c)) as usize <= len);
            let (c, _) = random_walk(&mut rng, &P2_MOVES, len);
            assert!(t.phase2_bound(CPerm::get(&c), EPerm::get(&c), MPerm::get(&c)) as usize <= len);
        }
    }
}

#[test_log::test]
fn sym_bounds_follow_moves() {
    let t = tables();
    let c = &t.coords;
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let (mut twist, mut flip, mut slice) = (0, 0, 0);
    let (mut twist_s, mut flip_s) = (c.twist_sym.class_of(0), c.flip_sym.class_of(0));
    for _ in 0..500 {
        let m = rng.gen_range(0..N_MOVES as u8);
        twist = c.twist_move.apply(twist, m);
        flip = c.flip_move.apply(flip, m);
        slice = c.slice_move.apply(slice, m);
        twist_s = c.twist_sym.apply_move(twist_s, m);
        flip_s = c.flip_sym.apply_move(flip_s, m);
        assert_eq!(t.slice_twist_bound_sym(twist_s, slice), t.slice_twist_bound(twist, slice));
        assert_eq!(t.slice_flip_bound_sym(flip_s, slice), t.slice_flip_bound(flip, slice));
        assert_eq!(t.twist_flip_bound_sym(twist_s, flip), t.twist_flip_bound(twist, flip));
    }
    let (mut cperm, mut eperm, mut mperm) = (0, 0, 0);
    let (mut cperm_s, mut eperm_s) = (c.cperm_sym.class_of(0), c.eperm_sym.class_of(0));
    for _ in 0..500 {
        let m = rng.gen_range(0..N_MOVES2 as u8);
        cperm = c.cperm_move.apply(cperm, P2_MOVES[m as usize]);
        eperm = c.eperm_move.apply(eperm, m);
        mperm = c.mperm_move.apply(mperm, m);
        cperm_s = c.cperm_sym.apply_move(cperm_s, P2_MOVES[m as usize]);
        eperm_s = c.eperm_sym.apply_move(eperm_s, m);
        assert_eq!(t.mcperm_bound_sym(cperm_s, mperm), t.mcperm_bound(cperm, mperm));
        assert_eq!(t.meperm_bound_sym(eperm_s, mperm), t.meperm_bound(eperm, mperm));
    }
}

#[test_log::test]
fn slice_sorted_follows_moves() {
    let c = &tables().coords;
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..20 {
        let (cube, walk) = random_walk(&mut rng, &(0..N_MOVES as u8).collect::<Vec<_>>(), 30);
        let index = c.slice_sorted_move.apply_all(0, &walk);
        assert_eq!(index / 24, Slice::get(&cube));
        assert_eq!(index / 24, c.slice_move.apply_all(0, &walk));
    }
}

#[test_log::test]
fn sequential_build_matches_global() {
    let conf = BuildConf { parallel: false, twist_flip_prun: false, ..Default::default() };
    let sequential = TableSet::build(&conf).unwrap();
    let global = tables();
    assert!(sequential.twist_flip_prun.is_none());
    assert_eq!(sequential.twist_flip_bound(0, 0), None);
    assert_eq!(sequential.pruning_tables().count(), 4);
    for (s, g) in sequential.pruning_tables().zip(global.pruning_tables().filter(|p| p.name() != "twist_flip")) {
        assert_eq!(s.name(), g.name());
        assert!(s.table().iter().eq(g.table().iter()), "{}", s.name());
    }
}
