//! Whole-game scenarios driven through the engine loop
