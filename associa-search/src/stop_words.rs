//! Built-in English stop-word list.
//!
//! Common function words that carry no associative meaning. Tokens in this
//! list never reach the score counter.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Default English stop words.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "'neath", "'twas", "'tween", "'twere", "'twill", "'twixt", "'twould", "a", "a's", "able",
    "about", "above", "according", "accordingly", "across", "actually", "afore", "aforesaid",
    "after", "afterwards", "again", "against", "agin", "ago", "ain't", "aint", "albeit", "all",
    "allow", "allows", "almost", "alone", "along", "alongside", "already", "also", "although",
    "always", "am", "american", "amid", "amidst", "among", "amongst", "an", "and", "anent",
    "another", "any", "anybody", "anyhow", "anyone", "anything", "anyway", "anyways", "anywhere",
    "apart", "appear", "appreciate", "appropriate", "are", "aren't", "around", "as", "aside", "ask",
    "asking", "aslant", "associated", "astride", "at", "athwart", "available", "away", "awfully",
    "b", "back", "bar", "barring", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "believe", "below", "beneath", "beside",
    "besides", "best", "better", "between", "betwixt", "beyond", "both", "brief", "but", "by", "c",
    "c'mon", "c's", "came", "can", "can't", "cannot", "cant", "cause", "causes", "certain",
    "certainly", "changes", "circa", "clearly", "close", "co", "com", "come", "comes", "concerning",
    "consequently", "consider", "considering", "contain", "containing", "contains", "corresponding",
    "cos", "could", "couldn't", "couldst", "course", "currently", "d", "dare", "dared", "daren't",
    "dares", "daring", "dear", "definitely", "described", "despite", "did", "didn't", "different",
    "directly", "do", "does", "doesn't", "doing", "don't", "done", "dost", "doth", "down",
    "downwards", "during", "durst", "e", "each", "early", "edu", "eg", "eight", "either", "else",
    "elsewhere", "em", "english", "enough", "entirely", "ere", "especially", "et", "etc", "even",
    "ever", "every", "everybody", "everyone", "everything", "everywhere", "ex", "exactly",
    "example", "except", "excepting", "f", "failing", "far", "few", "fifth", "first", "five",
    "followed", "following", "follows", "for", "former", "formerly", "forth", "four", "from",
    "further", "furthermore", "g", "get", "gets", "getting", "given", "gives", "go", "goes",
    "going", "gone", "gonna", "got", "gotta", "gotten", "greetings", "h", "had", "hadn't",
    "happens", "hard", "hardly", "has", "hasn't", "hast", "hath", "have", "haven't", "having", "he",
    "he'd", "he'll", "he's", "hello", "help", "hence", "her", "here", "here's", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "hi", "high", "him", "himself", "his",
    "hither", "home", "hopefully", "how", "how's", "howbeit", "however", "i", "i'd", "i'll", "i'm",
    "i've", "id", "ie", "if", "ignored", "ill", "immediate", "immediately", "important", "in",
    "inasmuch", "inc", "indeed", "indicate", "indicated", "indicates", "inner", "inside", "insofar",
    "instantly", "instead", "into", "inward", "is", "isn't", "it", "it'd", "it'll", "it's", "its",
    "itself", "j", "just", "k", "keep", "keeps", "kept", "know", "known", "knows", "l", "large",
    "last", "lately", "later", "latter", "latterly", "least", "left", "less", "lest", "let",
    "let's", "like", "liked", "likely", "likewise", "little", "living", "long", "look", "looking",
    "looks", "ltd", "m", "mainly", "many", "may", "maybe", "mayn't", "me", "mean", "meanwhile",
    "merely", "mid", "midst", "might", "mightn't", "mine", "minus", "more", "moreover", "most",
    "mostly", "much", "must", "mustn't", "my", "myself", "n", "name", "namely", "nd", "near",
    "nearly", "necessary", "need", "needed", "needing", "needn't", "needs", "neither", "never",
    "nevertheless", "new", "next", "nigh", "nigher", "nighest", "nine", "nisi", "no", "no-one",
    "nobody", "non", "none", "noone", "nor", "normally", "not", "nothing", "notwithstanding",
    "novel", "now", "nowhere", "o", "o'er", "obviously", "of", "off", "often", "oh", "ok", "okay",
    "old", "on", "once", "one", "ones", "oneself", "only", "onto", "open", "or", "other", "others",
    "otherwise", "ought", "oughtn't", "our", "ours", "ourselves", "out", "outside", "over",
    "overall", "own", "p", "particular", "particularly", "past", "pending", "per", "perhaps",
    "placed", "please", "plus", "possible", "present", "presumably", "probably", "provided",
    "provides", "providing", "public", "q", "qua", "que", "quite", "qv", "r", "rather", "rd", "re",
    "real", "really", "reasonably", "regarding", "regardless", "regards", "relatively",
    "respecting", "respectively", "right", "round", "s", "said", "same", "sans", "save", "saving",
    "saw", "say", "saying", "says", "second", "secondly", "see", "seeing", "seem", "seemed",
    "seeming", "seems", "seen", "self", "selves", "sensible", "sent", "serious", "seriously",
    "seven", "several", "shall", "shalt", "shan't", "she", "she's", "shed", "shell", "short",
    "should", "shouldn't", "since", "six", "small", "so", "some", "somebody", "somehow", "someone",
    "something", "sometime", "sometimes", "somewhat", "somewhere", "soon", "sorry", "special",
    "specified", "specify", "specifying", "still", "sub", "such", "summat", "sup", "supposing",
    "sure", "t", "t's", "take", "taken", "tell", "tends", "th", "than", "thank", "thanks", "thanx",
    "that", "that'd", "that'll", "that's", "thats", "the", "thee", "their", "their's", "theirs",
    "them", "themselves", "then", "thence", "there", "there's", "thereafter", "thereby",
    "therefore", "therein", "theres", "thereupon", "these", "they", "they'd", "they'll", "they're",
    "they've", "thine", "think", "third", "this", "tho", "thorough", "thoroughly", "those", "thou",
    "though", "three", "thro'", "through", "throughout", "thru", "thus", "thyself", "till", "tis",
    "to", "today", "together", "too", "took", "touching", "toward", "towards", "tried", "tries",
    "true", "truly", "try", "trying", "twas", "twice", "two", "u", "un", "under", "underneath",
    "unfortunately", "unless", "unlike", "unlikely", "until", "unto", "up", "upon", "us", "use",
    "used", "useful", "uses", "using", "usually", "v", "value", "various", "versus", "very", "via",
    "vice", "vis-a-vis", "viz", "vs", "w", "wanna", "want", "wanting", "wants", "was", "wasn't",
    "way", "we", "we'd", "we'll", "we're", "we've", "welcome", "well", "went", "were", "weren't",
    "wert", "what", "what'll", "what's", "whatever", "when", "when's", "whence", "whencesoever",
    "whenever", "where", "where's", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "whichever", "whichsoever", "while", "whilst", "whither", "who",
    "who'd", "who'll", "who's", "whoever", "whole", "whom", "whore", "whose", "whoso", "whosoever",
    "why", "will", "willing", "wish", "with", "within", "without", "won't", "wonder", "wont",
    "would", "wouldn't", "wouldst", "x", "y", "ye", "yes", "yet", "you", "you'd", "you'll",
    "you're", "you've", "your", "yours", "yourself", "yourselves", "z", "zero",
];

/// Lookup set over [`ENGLISH_STOP_WORDS`], built on first use.
pub static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Returns `true` if `word` is in the built-in stop-word list.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}
