use fnv::FnvHashMap;


pub type VocabMap = FnvHashMap<Box<[u8]>, u32>;


/// Id of the next new word. Ids are `u32`, so a corpus with more than 2^32
/// distinct words is refused rather than wrapped onto existing ids.
fn next_id(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("vocabulary exceeds {} distinct words", u32::MAX as u64 + 1))
}


/// Assigns ids in first-occurrence order while recording the id of every
/// token seen, so the token sequence and the vocabulary are built in one scan.
pub struct VocabBuilder {
    vocab: VocabMap,
    words: Vec<Box<[u8]>>,
    seq: Vec<u32>,
}

impl VocabBuilder {
    pub fn new() -> VocabBuilder {
        VocabBuilder {
            vocab: VocabMap::default(),
            words: Vec::new(),
            seq: Vec::new(),
        }
    }

    pub fn add(&mut self, elem: &[u8]) -> u32 {
        let idx = match self.vocab.get(elem) {
            Some(idx) => *idx,
            None => {
                let idx = next_id(self.words.len());
                let word: Box<[u8]> = elem.into();
                self.words.push(word.clone());
                self.vocab.insert(word, idx);
                idx
            }
        };
        self.seq.push(idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn build(self) -> (Vocab, Vec<u32>) {
        (Vocab { vocab: self.vocab, words: self.words }, self.seq)
    }
}

impl Default for VocabBuilder {
    fn default() -> VocabBuilder {
        VocabBuilder::new()
    }
}


/// Frozen token <-> id bijection. Ids are dense in `[0, len)`.
pub struct Vocab {
    vocab: VocabMap,
    words: Vec<Box<[u8]>>,
}

impl Vocab {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word: &[u8]) -> Option<u32> {
        self.vocab.get(word).copied()
    }

    pub fn word(&self, idx: u32) -> Option<&[u8]> {
        self.words.get(idx as usize).map(|w| &**w)
    }

    /// Words in id order.
    pub fn words(&self) -> impl Iterator<Item=&[u8]> {
        self.words.iter().map(|w| &**w)
    }
}
